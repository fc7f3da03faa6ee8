//! Grant repository: listing, lookup, planning updates, delete, import.

use chrono::Utc;

use grant_core::entities::{Grant, ImportSummary, NewGrant};
use grant_core::enums::{GrantStatus, Priority};
use grant_core::errors::CoreError;
use grant_core::ordering::sort_grants;

use crate::error::DatabaseError;
use crate::helpers::{
    collect_rows, encode_string_list, format_date, get_bool, get_opt_date, get_opt_string,
    parse_datetime, parse_enum, parse_string_list,
};
use crate::service::GrantService;
use crate::updates::grant::GrantUpdate;

pub(crate) const SELECT_COLS: &str = "id, name, amount, ease, fit, category, deadline, url, \
     priority, status, notes, application_date, suggested_month, documents_needed, outcome, \
     decision_date, amount_awarded, rejection_reasons, funder_feedback, lessons_learned, \
     resubmission_date, is_annual_grant, improvements_needed, created_at, updated_at";

pub(crate) fn row_to_grant(row: &libsql::Row) -> Result<Grant, DatabaseError> {
    Ok(Grant {
        id: row.get(0)?,
        name: row.get(1)?,
        amount: get_opt_string(row, 2)?,
        ease: row.get::<Option<i64>>(3)?,
        fit: row.get::<Option<i64>>(4)?,
        category: get_opt_string(row, 5)?,
        deadline: get_opt_string(row, 6)?,
        url: get_opt_string(row, 7)?,
        priority: Priority::from(row.get::<String>(8)?),
        status: parse_enum(&row.get::<String>(9)?)?,
        notes: get_opt_string(row, 10)?,
        application_date: get_opt_date(row, 11)?,
        suggested_month: get_opt_string(row, 12)?,
        documents_needed: parse_string_list(get_opt_string(row, 13)?.as_deref())?,
        outcome: get_opt_string(row, 14)?
            .map(|s| parse_enum(&s))
            .transpose()?,
        decision_date: get_opt_date(row, 15)?,
        amount_awarded: row.get::<Option<i64>>(16)?,
        rejection_reasons: get_opt_string(row, 17)?,
        funder_feedback: get_opt_string(row, 18)?,
        lessons_learned: get_opt_string(row, 19)?,
        resubmission_date: get_opt_date(row, 20)?,
        is_annual_grant: get_bool(row, 21)?,
        improvements_needed: get_opt_string(row, 22)?,
        created_at: parse_datetime(&row.get::<String>(23)?)?,
        updated_at: parse_datetime(&row.get::<String>(24)?)?,
    })
}

/// Load one grant over an existing connection.
pub(crate) async fn fetch_grant(
    conn: &libsql::Connection,
    id: i64,
) -> Result<Option<Grant>, DatabaseError> {
    let mut rows = conn
        .query(&format!("SELECT {SELECT_COLS} FROM grants WHERE id = ?1"), [id])
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_grant(&row)?)),
        None => Ok(None),
    }
}

/// Fail with `NotFound` unless the grant exists.
pub(crate) async fn ensure_grant(
    conn: &libsql::Connection,
    id: i64,
) -> Result<(), DatabaseError> {
    let mut rows = conn
        .query("SELECT 1 FROM grants WHERE id = ?1", [id])
        .await?;
    if rows.next().await?.is_none() {
        return Err(DatabaseError::not_found("Grant", id));
    }
    Ok(())
}

fn check_new_grant(grant: &NewGrant) -> Result<(), CoreError> {
    if grant.name.trim().is_empty() {
        return Err(CoreError::validation("name must not be empty"));
    }
    for (field, value) in [("ease", grant.ease), ("fit", grant.fit)] {
        if let Some(score) = value {
            if !(1..=5).contains(&score) {
                return Err(CoreError::validation(format!(
                    "{field} must be between 1 and 5, got {score}"
                )));
            }
        }
    }
    Ok(())
}

impl GrantService {
    /// All grants in listing order: priority, then name, then id.
    pub async fn list_grants(&self) -> Result<Vec<Grant>, DatabaseError> {
        let conn = self.db().connect().await?;
        let rows = conn
            .query(&format!("SELECT {SELECT_COLS} FROM grants"), ())
            .await?;
        let mut grants = collect_rows(rows, row_to_grant).await?;
        sort_grants(&mut grants);
        Ok(grants)
    }

    pub async fn get_grant(&self, id: i64) -> Result<Grant, DatabaseError> {
        let conn = self.db().connect().await?;
        fetch_grant(&conn, id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Grant", id))
    }

    /// Apply a partial update to the planning fields of a grant.
    ///
    /// An empty update returns the grant unchanged without touching
    /// `updated_at`. Once an outcome is recorded the status is fixed.
    pub async fn update_grant(
        &self,
        id: i64,
        update: GrantUpdate,
    ) -> Result<Grant, DatabaseError> {
        update.validate()?;

        let conn = self.db().connect().await?;
        if update.is_empty() {
            return fetch_grant(&conn, id)
                .await?
                .ok_or_else(|| DatabaseError::not_found("Grant", id));
        }

        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        let mut push = |column: &str, value: libsql::Value| {
            sets.push(format!("{column} = ?{idx}"));
            params.push(value);
            idx += 1;
        };

        if let Some(name) = update.name {
            push("name", name.trim().to_string().into());
        }
        if let Some(amount) = update.amount {
            push("amount", amount.map_or(libsql::Value::Null, Into::into));
        }
        if let Some(ease) = update.ease {
            push("ease", ease.map_or(libsql::Value::Null, Into::into));
        }
        if let Some(fit) = update.fit {
            push("fit", fit.map_or(libsql::Value::Null, Into::into));
        }
        if let Some(category) = update.category {
            push("category", category.map_or(libsql::Value::Null, Into::into));
        }
        if let Some(deadline) = update.deadline {
            push("deadline", deadline.map_or(libsql::Value::Null, Into::into));
        }
        if let Some(url) = update.url {
            push("url", url.map_or(libsql::Value::Null, Into::into));
        }
        if let Some(priority) = update.priority {
            push("priority", String::from(priority).into());
        }
        if let Some(status) = update.status {
            push("status", status.as_str().into());
        }
        if let Some(notes) = update.notes {
            push("notes", notes.map_or(libsql::Value::Null, Into::into));
        }
        if let Some(date) = update.application_date {
            push(
                "application_date",
                date.map_or(libsql::Value::Null, |d| format_date(d).into()),
            );
        }
        if let Some(month) = update.suggested_month {
            push("suggested_month", month.map_or(libsql::Value::Null, Into::into));
        }
        if let Some(documents) = update.documents_needed {
            push("documents_needed", encode_string_list(&documents)?.into());
        }
        push("updated_at", Utc::now().to_rfc3339().into());

        params.push(id.into());
        let sql = format!("UPDATE grants SET {} WHERE id = ?{idx}", sets.join(", "));

        let tx = conn.transaction().await?;
        if let Some(status) = update.status {
            let stored = fetch_grant(&tx, id)
                .await?
                .ok_or_else(|| DatabaseError::not_found("Grant", id))?;
            if let Some(outcome) = stored.outcome {
                if status != stored.status {
                    return Err(DatabaseError::Validation(format!(
                        "grant {id} has a recorded outcome '{outcome}'; its status cannot change"
                    )));
                }
            }
        }
        let affected = tx
            .execute(&sql, libsql::params_from_iter(params))
            .await?;
        if affected == 0 {
            return Err(DatabaseError::not_found("Grant", id));
        }
        tx.commit().await?;

        fetch_grant(&conn, id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Grant", id))
    }

    /// Delete a grant and, through `ON DELETE CASCADE`, its files,
    /// communications and reminders.
    ///
    /// Returns the stored paths of the deleted files so the caller can remove
    /// the bytes.
    pub async fn delete_grant(&self, id: i64) -> Result<Vec<String>, DatabaseError> {
        let conn = self.db().connect().await?;
        let tx = conn.transaction().await?;

        let rows = tx
            .query(
                "SELECT file_path FROM application_files WHERE grant_id = ?1",
                [id],
            )
            .await?;
        let paths = collect_rows(rows, |row| Ok(row.get::<String>(0)?)).await?;

        let affected = tx.execute("DELETE FROM grants WHERE id = ?1", [id]).await?;
        if affected == 0 {
            return Err(DatabaseError::not_found("Grant", id));
        }
        tx.commit().await?;

        tracing::info!(grant_id = id, files = paths.len(), "grant deleted");
        Ok(paths)
    }

    /// Insert one grant, applying the import defaults.
    pub async fn insert_grant(&self, grant: &NewGrant) -> Result<Grant, DatabaseError> {
        check_new_grant(grant)?;
        let conn = self.db().connect().await?;
        let now = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO grants (name, amount, ease, fit, category, deadline, url, priority, \
             status, notes, suggested_month, documents_needed, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            libsql::params![
                grant.name.trim(),
                grant.amount.as_deref(),
                grant.ease.unwrap_or(NewGrant::DEFAULT_EASE),
                grant.fit.unwrap_or(NewGrant::DEFAULT_FIT),
                grant.category.as_deref(),
                grant.deadline.as_deref(),
                grant.url.as_deref(),
                String::from(grant.priority.clone().unwrap_or_default()),
                grant.status.unwrap_or_default().as_str(),
                grant.notes.as_deref(),
                grant.suggested_month.as_deref(),
                encode_string_list(&grant.documents_needed)?,
                now.as_str(),
                now.as_str()
            ],
        )
        .await?;

        let id = conn.last_insert_rowid();
        fetch_grant(&conn, id).await?.ok_or(DatabaseError::NoResult)
    }

    pub async fn grant_name_exists(&self, name: &str) -> Result<bool, DatabaseError> {
        let conn = self.db().connect().await?;
        let mut rows = conn
            .query("SELECT 1 FROM grants WHERE name = ?1 LIMIT 1", [name.trim()])
            .await?;
        Ok(rows.next().await?.is_some())
    }

    pub async fn count_grants(&self) -> Result<u64, DatabaseError> {
        let conn = self.db().connect().await?;
        let mut rows = conn.query("SELECT COUNT(*) FROM grants", ()).await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        u64::try_from(row.get::<i64>(0)?).map_err(|e| DatabaseError::Other(e.into()))
    }

    /// Import grant records. Names that already exist are skipped; records
    /// that fail to parse or insert are logged and counted, never fatal.
    pub async fn import_grants(
        &self,
        records: Vec<serde_json::Value>,
    ) -> Result<ImportSummary, DatabaseError> {
        let mut summary = ImportSummary::default();

        for (index, record) in records.into_iter().enumerate() {
            let grant: NewGrant = match serde_json::from_value(record) {
                Ok(grant) => grant,
                Err(e) => {
                    tracing::warn!(index, error = %e, "skipping unreadable grant record");
                    summary.failed += 1;
                    continue;
                }
            };

            if self.grant_name_exists(&grant.name).await? {
                tracing::debug!(name = %grant.name, "grant already present");
                summary.skipped += 1;
                continue;
            }

            match self.insert_grant(&grant).await {
                Ok(inserted) => {
                    tracing::debug!(id = inserted.id, name = %inserted.name, "grant imported");
                    summary.imported += 1;
                }
                Err(e) => {
                    tracing::warn!(index, name = %grant.name, error = %e, "grant import failed");
                    summary.failed += 1;
                }
            }
        }

        tracing::info!(
            imported = summary.imported,
            skipped = summary.skipped,
            failed = summary.failed,
            "grant import finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{seed_grant, test_service};
    use crate::updates::grant::GrantUpdateBuilder;
    use grant_core::lifecycle::OutcomeSubmission;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn insert_applies_defaults() {
        let (_dir, svc) = test_service().await;
        let grant = svc.insert_grant(&NewGrant::named("Arts Council")).await.unwrap();

        assert_eq!(grant.name, "Arts Council");
        assert_eq!(grant.ease, Some(3));
        assert_eq!(grant.fit, Some(3));
        assert_eq!(grant.priority, Priority::Medium);
        assert_eq!(grant.status, GrantStatus::NotStarted);
        assert!(grant.documents_needed.is_empty());
        assert!(!grant.is_annual_grant);
        assert_eq!(grant.outcome, None);
    }

    #[tokio::test]
    async fn list_is_sorted_by_priority_then_name() {
        let (_dir, svc) = test_service().await;
        seed_grant(&svc, "Zebra", Priority::Low, GrantStatus::NotStarted).await;
        seed_grant(&svc, "Beta", Priority::Highest, GrantStatus::NotStarted).await;
        seed_grant(&svc, "Alpha", Priority::Other("Someday".into()), GrantStatus::NotStarted)
            .await;
        seed_grant(&svc, "Alpha", Priority::Highest, GrantStatus::NotStarted).await;
        seed_grant(&svc, "Gamma", Priority::Medium, GrantStatus::NotStarted).await;

        let names: Vec<(String, String)> = svc
            .list_grants()
            .await
            .unwrap()
            .into_iter()
            .map(|g| (g.priority.to_string(), g.name))
            .collect();
        assert_eq!(
            names,
            vec![
                ("HIGHEST".to_string(), "Alpha".to_string()),
                ("HIGHEST".to_string(), "Beta".to_string()),
                ("MEDIUM".to_string(), "Gamma".to_string()),
                ("LOW".to_string(), "Zebra".to_string()),
                ("Someday".to_string(), "Alpha".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn get_missing_grant_is_not_found() {
        let (_dir, svc) = test_service().await;
        let err = svc.get_grant(42).await.unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[tokio::test]
    async fn update_writes_only_supplied_fields() {
        let (_dir, svc) = test_service().await;
        let grant = svc
            .insert_grant(&NewGrant {
                amount: Some("£1,000".into()),
                notes: Some("keep me".into()),
                ..NewGrant::named("Trust")
            })
            .await
            .unwrap();

        let update = GrantUpdateBuilder::new()
            .status(GrantStatus::Preparing)
            .amount(None)
            .documents_needed(vec!["Budget".into()])
            .build();
        let updated = svc.update_grant(grant.id, update).await.unwrap();

        assert_eq!(updated.status, GrantStatus::Preparing);
        assert_eq!(updated.amount, None);
        assert_eq!(updated.notes.as_deref(), Some("keep me"));
        assert_eq!(updated.documents_needed, vec!["Budget".to_string()]);
        assert!(updated.updated_at >= grant.updated_at);
    }

    #[tokio::test]
    async fn update_rejects_outcome_status() {
        let (_dir, svc) = test_service().await;
        let grant = seed_grant(&svc, "Trust", Priority::High, GrantStatus::Submitted).await;
        let update = GrantUpdateBuilder::new()
            .status(GrantStatus::Successful)
            .build();
        let err = svc.update_grant(grant.id, update).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Validation(_)));
        assert_eq!(
            svc.get_grant(grant.id).await.unwrap().status,
            GrantStatus::Submitted
        );
    }

    #[tokio::test]
    async fn status_is_fixed_once_outcome_recorded() {
        let (_dir, svc) = test_service().await;
        let grant = seed_grant(&svc, "Trust", Priority::High, GrantStatus::Submitted).await;
        svc.record_outcome(
            grant.id,
            OutcomeSubmission {
                outcome: Some("Successful".into()),
                decision_date: Some("2025-10-01".into()),
                amount_awarded: Some(1000),
                ..OutcomeSubmission::default()
            },
        )
        .await
        .unwrap();

        let reopen = GrantUpdateBuilder::new()
            .status(GrantStatus::Submitted)
            .notes(Some("reopened".into()))
            .build();
        let err = svc.update_grant(grant.id, reopen).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Validation(_)));

        let stored = svc.get_grant(grant.id).await.unwrap();
        assert_eq!(stored.status, GrantStatus::Successful);
        assert_eq!(stored.notes, None);

        let stats = svc.compute_stats().await.unwrap();
        assert_eq!(stats.awaiting_decision, 0);
        assert_eq!(stats.successful, 1);

        // Other planning fields stay editable.
        let noted = svc
            .update_grant(
                grant.id,
                GrantUpdateBuilder::new().notes(Some("won".into())).build(),
            )
            .await
            .unwrap();
        assert_eq!(noted.notes.as_deref(), Some("won"));
        assert_eq!(noted.status, GrantStatus::Successful);
    }

    #[tokio::test]
    async fn update_missing_grant_is_not_found() {
        let (_dir, svc) = test_service().await;
        let update = GrantUpdateBuilder::new().notes(Some("x".into())).build();
        assert!(matches!(
            svc.update_grant(99, update).await,
            Err(DatabaseError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn delete_missing_grant_is_not_found() {
        let (_dir, svc) = test_service().await;
        assert!(svc.delete_grant(7).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn import_skips_existing_and_counts_failures() {
        let (_dir, svc) = test_service().await;
        seed_grant(&svc, "Existing", Priority::High, GrantStatus::NotStarted).await;

        let records = vec![
            serde_json::json!({"name": "Existing"}),
            serde_json::json!({"name": "New Fund", "amount": 5000, "priority": "high"}),
            serde_json::json!({"amount": "no name"}),
            serde_json::json!({"name": "Bad Score", "ease": 9}),
            serde_json::json!({"name": "New Fund"}),
        ];
        let summary = svc.import_grants(records).await.unwrap();

        assert_eq!(
            summary,
            ImportSummary {
                imported: 1,
                skipped: 2,
                failed: 2,
            }
        );
        let imported = svc
            .list_grants()
            .await
            .unwrap()
            .into_iter()
            .find(|g| g.name == "New Fund")
            .unwrap();
        assert_eq!(imported.amount.as_deref(), Some("5000"));
        assert_eq!(imported.priority, Priority::High);
        assert_eq!(svc.count_grants().await.unwrap(), 2);
    }
}
