//! Monthly strategy: grants grouped by their suggested submission month.

use std::collections::BTreeMap;

use grant_core::dates::parse_month_label;
use grant_core::entities::{MonthGroup, StrategyGrant};
use grant_core::enums::Priority;
use grant_core::ordering::sort_strategy_grants;

use crate::error::DatabaseError;
use crate::helpers::{collect_rows, get_opt_string, parse_enum};
use crate::service::GrantService;

fn row_to_strategy_row(row: &libsql::Row) -> Result<(String, StrategyGrant), DatabaseError> {
    Ok((
        row.get::<String>(6)?,
        StrategyGrant {
            id: row.get(0)?,
            name: row.get(1)?,
            amount: get_opt_string(row, 2)?,
            priority: Priority::from(row.get::<String>(3)?),
            status: parse_enum(&row.get::<String>(4)?)?,
            deadline: get_opt_string(row, 5)?,
        },
    ))
}

impl GrantService {
    /// Groups ordered by calendar month (labels that are not `Month YYYY`
    /// go last, alphabetically); grants inside a group in listing order.
    pub async fn monthly_strategy(&self) -> Result<Vec<MonthGroup>, DatabaseError> {
        let conn = self.db().connect().await?;
        let rows = conn
            .query(
                "SELECT id, name, amount, priority, status, deadline, suggested_month \
                 FROM grants \
                 WHERE suggested_month IS NOT NULL AND TRIM(suggested_month) != ''",
                (),
            )
            .await?;

        let mut by_month: BTreeMap<String, Vec<StrategyGrant>> = BTreeMap::new();
        for (month, grant) in collect_rows(rows, row_to_strategy_row).await? {
            by_month.entry(month).or_default().push(grant);
        }

        let mut groups: Vec<MonthGroup> = by_month
            .into_iter()
            .map(|(suggested_month, mut grants)| {
                sort_strategy_grants(&mut grants);
                MonthGroup {
                    suggested_month,
                    count: grants.len(),
                    grants,
                }
            })
            .collect();

        // BTreeMap order already breaks ties alphabetically; the sort is stable.
        groups.sort_by_cached_key(|group| {
            let month = parse_month_label(&group.suggested_month);
            (month.is_none(), month)
        });
        Ok(groups)
    }
}
