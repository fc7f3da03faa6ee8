//! Dashboard aggregation.

use grant_core::dates::parse_deadline;
use grant_core::entities::{DashboardStats, DeadlineEntry, OutcomeEntry};
use grant_core::enums::{GrantStatus, Outcome, Priority};
use grant_core::stats::success_rate;

use crate::error::DatabaseError;
use crate::helpers::{collect_rows, get_opt_date, get_opt_string, parse_enum};
use crate::service::GrantService;

/// Number of entries in each dashboard list.
pub const DASHBOARD_LIST_LIMIT: usize = 5;

fn count(row: &libsql::Row, idx: i32) -> Result<u64, DatabaseError> {
    u64::try_from(row.get::<i64>(idx)?).map_err(|e| DatabaseError::Other(e.into()))
}

fn row_to_deadline_entry(row: &libsql::Row) -> Result<DeadlineEntry, DatabaseError> {
    Ok(DeadlineEntry {
        id: row.get(0)?,
        name: row.get(1)?,
        deadline: row.get(2)?,
        amount: get_opt_string(row, 3)?,
        priority: Priority::from(row.get::<String>(4)?),
        status: parse_enum(&row.get::<String>(5)?)?,
    })
}

fn row_to_outcome_entry(row: &libsql::Row) -> Result<OutcomeEntry, DatabaseError> {
    Ok(OutcomeEntry {
        id: row.get(0)?,
        name: row.get(1)?,
        outcome: parse_enum::<Outcome>(&row.get::<String>(2)?)?,
        decision_date: get_opt_date(row, 3)?,
        amount_awarded: row.get::<Option<i64>>(4)?,
    })
}

/// Order open deadlines by parsed date; labels that do not parse go last.
fn sort_deadlines(entries: &mut [DeadlineEntry]) {
    entries.sort_by_cached_key(|entry| {
        let parsed = parse_deadline(&entry.deadline);
        (parsed.is_none(), parsed, entry.id)
    });
}

impl GrantService {
    /// Summary counts, award total, the next open deadlines and the most
    /// recent decisions.
    pub async fn compute_stats(&self) -> Result<DashboardStats, DatabaseError> {
        let conn = self.db().connect().await?;

        let mut rows = conn
            .query(
                "SELECT COUNT(*), \
                 COALESCE(SUM(status IN (?1, ?2)), 0), \
                 COALESCE(SUM(outcome = ?3), 0), \
                 COALESCE(SUM(outcome = ?4), 0), \
                 COALESCE(SUM(status = ?5), 0), \
                 COALESCE(SUM(status = ?6), 0), \
                 COALESCE(SUM(CASE WHEN outcome = ?3 THEN amount_awarded END), 0) \
                 FROM grants",
                libsql::params![
                    GrantStatus::Submitted.as_str(),
                    GrantStatus::UnderReview.as_str(),
                    Outcome::Successful.as_str(),
                    Outcome::Unsuccessful.as_str(),
                    GrantStatus::NotStarted.as_str(),
                    GrantStatus::Preparing.as_str()
                ],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let total_grants = count(&row, 0)?;
        let awaiting_decision = count(&row, 1)?;
        let successful = count(&row, 2)?;
        let unsuccessful = count(&row, 3)?;
        let not_started = count(&row, 4)?;
        let preparing = count(&row, 5)?;
        let total_won = row.get::<i64>(6)?;
        drop(rows);

        let deadline_rows = conn
            .query(
                "SELECT id, name, deadline, amount, priority, status FROM grants \
                 WHERE status NOT IN (?1, ?2, ?3) AND deadline IS NOT NULL",
                libsql::params![
                    GrantStatus::Successful.as_str(),
                    GrantStatus::Unsuccessful.as_str(),
                    GrantStatus::Withdrawn.as_str()
                ],
            )
            .await?;
        let mut upcoming_deadlines = collect_rows(deadline_rows, row_to_deadline_entry).await?;
        sort_deadlines(&mut upcoming_deadlines);
        upcoming_deadlines.truncate(DASHBOARD_LIST_LIMIT);

        let outcome_rows = conn
            .query(
                &format!(
                    "SELECT id, name, outcome, decision_date, amount_awarded FROM grants \
                     WHERE outcome IS NOT NULL \
                     ORDER BY decision_date DESC, id DESC LIMIT {DASHBOARD_LIST_LIMIT}"
                ),
                (),
            )
            .await?;
        let recent_outcomes = collect_rows(outcome_rows, row_to_outcome_entry).await?;

        Ok(DashboardStats {
            total_grants,
            awaiting_decision,
            successful,
            unsuccessful,
            not_started,
            preparing,
            total_won,
            success_rate: success_rate(successful, unsuccessful, awaiting_decision),
            upcoming_deadlines,
            recent_outcomes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{seed_grant, test_service};
    use crate::updates::grant::GrantUpdateBuilder;
    use grant_core::lifecycle::OutcomeSubmission;
    use pretty_assertions::assert_eq;

    fn awarded(amount: i64, decided: &str) -> OutcomeSubmission {
        OutcomeSubmission {
            outcome: Some("Successful".into()),
            decision_date: Some(decided.into()),
            amount_awarded: Some(amount),
            ..OutcomeSubmission::default()
        }
    }

    #[tokio::test]
    async fn empty_database_is_all_zero() {
        let (_dir, svc) = test_service().await;
        let stats = svc.compute_stats().await.unwrap();
        assert_eq!(stats, DashboardStats::default());
        assert_eq!(stats.total_won, 0);
    }

    #[tokio::test]
    async fn totals_and_rate() {
        let (_dir, svc) = test_service().await;
        let a = seed_grant(&svc, "A", Priority::High, GrantStatus::Submitted).await;
        let b = seed_grant(&svc, "B", Priority::High, GrantStatus::Submitted).await;
        seed_grant(&svc, "C", Priority::Low, GrantStatus::UnderReview).await;
        seed_grant(&svc, "D", Priority::Low, GrantStatus::NotStarted).await;
        seed_grant(&svc, "E", Priority::Low, GrantStatus::Preparing).await;

        svc.record_outcome(a.id, awarded(1000, "2025-06-01")).await.unwrap();
        svc.record_outcome(b.id, awarded(2000, "2025-07-01")).await.unwrap();

        let stats = svc.compute_stats().await.unwrap();
        assert_eq!(stats.total_grants, 5);
        assert_eq!(stats.successful, 2);
        assert_eq!(stats.unsuccessful, 0);
        assert_eq!(stats.awaiting_decision, 1);
        assert_eq!(stats.not_started, 1);
        assert_eq!(stats.preparing, 1);
        assert_eq!(stats.total_won, 3000);
        assert!((stats.success_rate - 66.7).abs() < 1e-9);

        let recent: Vec<i64> = stats.recent_outcomes.iter().map(|o| o.id).collect();
        assert_eq!(recent, vec![b.id, a.id]);
    }

    #[tokio::test]
    async fn upcoming_deadlines_skip_closed_and_put_unparseable_last() {
        let (_dir, svc) = test_service().await;
        for (name, deadline, status) in [
            ("Rolling", "Rolling", GrantStatus::NotStarted),
            ("Late", "2026-05-01", GrantStatus::Preparing),
            ("Soon", "Mar 15, 2026", GrantStatus::NotStarted),
            ("Withdrawn", "2026-01-01", GrantStatus::Withdrawn),
            ("Blank", "  ", GrantStatus::Preparing),
        ] {
            let grant = seed_grant(&svc, name, Priority::Medium, status).await;
            svc.update_grant(
                grant.id,
                GrantUpdateBuilder::new()
                    .deadline(Some(deadline.into()))
                    .build(),
            )
            .await
            .unwrap();
        }
        seed_grant(&svc, "No deadline", Priority::Medium, GrantStatus::NotStarted).await;

        let stats = svc.compute_stats().await.unwrap();
        let names: Vec<&str> = stats
            .upcoming_deadlines
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(names, vec!["Soon", "Late", "Rolling", "Blank"]);
    }

    #[tokio::test]
    async fn lists_are_capped() {
        let (_dir, svc) = test_service().await;
        for i in 0..7 {
            let grant = seed_grant(&svc, &format!("G{i}"), Priority::Medium, GrantStatus::Submitted)
                .await;
            svc.update_grant(
                grant.id,
                GrantUpdateBuilder::new()
                    .deadline(Some(format!("2026-01-0{}", i + 1)))
                    .build(),
            )
            .await
            .unwrap();
            svc.record_outcome(grant.id, awarded(10, &format!("2025-01-0{}", i + 1)))
                .await
                .unwrap();
        }
        for i in 0..6 {
            let grant =
                seed_grant(&svc, &format!("Open{i}"), Priority::Medium, GrantStatus::Preparing)
                    .await;
            svc.update_grant(
                grant.id,
                GrantUpdateBuilder::new()
                    .deadline(Some(format!("2026-02-0{}", i + 1)))
                    .build(),
            )
            .await
            .unwrap();
        }

        let stats = svc.compute_stats().await.unwrap();
        assert_eq!(stats.recent_outcomes.len(), DASHBOARD_LIST_LIMIT);
        assert_eq!(stats.recent_outcomes[0].decision_date.unwrap().to_string(), "2025-01-07");
        assert_eq!(stats.upcoming_deadlines.len(), DASHBOARD_LIST_LIMIT);
        assert_eq!(stats.upcoming_deadlines[0].name, "Open0");
        assert_eq!(stats.total_won, 70);
    }
}
