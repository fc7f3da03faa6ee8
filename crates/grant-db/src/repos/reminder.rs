//! Reminder repository: the upcoming-reminder query, mark-as-sent, and
//! user-managed reminders.

use chrono::{NaiveDate, Utc};

use grant_core::dates::reminder_horizon;
use grant_core::entities::{NewReminder, Reminder, ReminderWithGrant};
use grant_core::enums::ReminderType;

use crate::error::DatabaseError;
use crate::helpers::{
    collect_rows, format_date, get_bool, get_opt_string, parse_date, parse_datetime,
    parse_enum, parse_optional_datetime,
};
use crate::repos::grant::ensure_grant;
use crate::service::GrantService;

const SELECT_COLS: &str =
    "id, grant_id, reminder_type, reminder_date, sent, email_sent_at, created_at";

fn row_to_reminder(row: &libsql::Row) -> Result<Reminder, DatabaseError> {
    Ok(Reminder {
        id: row.get(0)?,
        grant_id: row.get(1)?,
        reminder_type: parse_enum(&row.get::<String>(2)?)?,
        reminder_date: parse_date(&row.get::<String>(3)?)?,
        sent: get_bool(row, 4)?,
        email_sent_at: parse_optional_datetime(get_opt_string(row, 5)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

fn row_to_reminder_with_grant(row: &libsql::Row) -> Result<ReminderWithGrant, DatabaseError> {
    Ok(ReminderWithGrant {
        reminder: row_to_reminder(row)?,
        name: row.get(7)?,
        deadline: get_opt_string(row, 8)?,
        amount: get_opt_string(row, 9)?,
    })
}

/// Insert a reminder over an existing connection or transaction.
/// Returns the new row id.
pub(crate) async fn insert_reminder(
    conn: &libsql::Connection,
    grant_id: i64,
    reminder_type: ReminderType,
    reminder_date: NaiveDate,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO reminders (grant_id, reminder_type, reminder_date, sent, created_at) \
         VALUES (?1, ?2, ?3, 0, ?4)",
        libsql::params![
            grant_id,
            reminder_type.as_str(),
            format_date(reminder_date),
            Utc::now().to_rfc3339()
        ],
    )
    .await?;
    Ok(conn.last_insert_rowid())
}

async fn fetch_reminder(
    conn: &libsql::Connection,
    id: i64,
) -> Result<Option<Reminder>, DatabaseError> {
    let mut rows = conn
        .query(&format!("SELECT {SELECT_COLS} FROM reminders WHERE id = ?1"), [id])
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_reminder(&row)?)),
        None => Ok(None),
    }
}

impl GrantService {
    /// Unsent reminders dated on or before `as_of` plus the reminder window,
    /// earliest first, ties broken by id. Overdue reminders stay listed until
    /// they are marked sent.
    pub async fn due_reminders(
        &self,
        as_of: NaiveDate,
    ) -> Result<Vec<ReminderWithGrant>, DatabaseError> {
        let horizon = reminder_horizon(as_of);
        let conn = self.db().connect().await?;
        let rows = conn
            .query(
                "SELECT r.id, r.grant_id, r.reminder_type, r.reminder_date, r.sent, \
                 r.email_sent_at, r.created_at, g.name, g.deadline, g.amount \
                 FROM reminders r \
                 JOIN grants g ON g.id = r.grant_id \
                 WHERE r.sent = 0 AND r.reminder_date <= ?1 \
                 ORDER BY r.reminder_date, r.id",
                [format_date(horizon)],
            )
            .await?;
        collect_rows(rows, row_to_reminder_with_grant).await
    }

    /// Mark a reminder as sent. One-way: a reminder that is already sent is
    /// returned unchanged, keeping its original `email_sent_at`.
    pub async fn mark_reminder_sent(&self, id: i64) -> Result<Reminder, DatabaseError> {
        let conn = self.db().connect().await?;
        let changed = conn
            .execute(
                "UPDATE reminders SET sent = 1, email_sent_at = ?1 WHERE id = ?2 AND sent = 0",
                libsql::params![Utc::now().to_rfc3339(), id],
            )
            .await?;
        let reminder = fetch_reminder(&conn, id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Reminder", id))?;
        if changed > 0 {
            tracing::info!(reminder_id = id, grant_id = reminder.grant_id, "reminder marked sent");
        }
        Ok(reminder)
    }

    pub async fn create_reminder(
        &self,
        grant_id: i64,
        reminder: &NewReminder,
    ) -> Result<Reminder, DatabaseError> {
        let conn = self.db().connect().await?;
        ensure_grant(&conn, grant_id).await?;
        let id = insert_reminder(
            &conn,
            grant_id,
            reminder.reminder_type,
            reminder.reminder_date,
        )
        .await?;
        fetch_reminder(&conn, id).await?.ok_or(DatabaseError::NoResult)
    }

    pub async fn get_reminder(&self, id: i64) -> Result<Reminder, DatabaseError> {
        let conn = self.db().connect().await?;
        fetch_reminder(&conn, id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Reminder", id))
    }

    /// All reminders of one grant, sent or not, by date.
    pub async fn list_reminders_for_grant(
        &self,
        grant_id: i64,
    ) -> Result<Vec<Reminder>, DatabaseError> {
        let conn = self.db().connect().await?;
        ensure_grant(&conn, grant_id).await?;
        let rows = conn
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM reminders WHERE grant_id = ?1 \
                     ORDER BY reminder_date, id"
                ),
                [grant_id],
            )
            .await?;
        collect_rows(rows, row_to_reminder).await
    }

    pub async fn delete_reminder(&self, id: i64) -> Result<(), DatabaseError> {
        let conn = self.db().connect().await?;
        let affected = conn
            .execute("DELETE FROM reminders WHERE id = ?1", [id])
            .await?;
        if affected == 0 {
            return Err(DatabaseError::not_found("Reminder", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{seed_grant, test_service};
    use grant_core::enums::{GrantStatus, Priority};
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn add(svc: &GrantService, grant_id: i64, on: NaiveDate) -> Reminder {
        svc.create_reminder(
            grant_id,
            &NewReminder {
                reminder_type: ReminderType::Deadline,
                reminder_date: on,
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn due_reminders_respects_window_and_sent_flag() {
        let (_dir, svc) = test_service().await;
        let grant = seed_grant(&svc, "Trust", Priority::High, GrantStatus::Preparing).await;

        let overdue = add(&svc, grant.id, date(2024, 12, 1)).await;
        let edge = add(&svc, grant.id, date(2025, 1, 31)).await;
        let _late = add(&svc, grant.id, date(2025, 2, 1)).await;
        let sent = add(&svc, grant.id, date(2025, 1, 10)).await;
        svc.mark_reminder_sent(sent.id).await.unwrap();

        let due = svc.due_reminders(date(2025, 1, 1)).await.unwrap();
        let ids: Vec<i64> = due.iter().map(|r| r.reminder.id).collect();
        assert_eq!(ids, vec![overdue.id, edge.id]);
        assert_eq!(due[0].name, "Trust");
    }

    #[tokio::test]
    async fn same_day_reminders_order_by_id() {
        let (_dir, svc) = test_service().await;
        let grant = seed_grant(&svc, "Trust", Priority::High, GrantStatus::Preparing).await;
        let first = add(&svc, grant.id, date(2025, 1, 5)).await;
        let second = add(&svc, grant.id, date(2025, 1, 5)).await;

        let due = svc.due_reminders(date(2025, 1, 1)).await.unwrap();
        let ids: Vec<i64> = due.iter().map(|r| r.reminder.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn mark_sent_is_idempotent() {
        let (_dir, svc) = test_service().await;
        let grant = seed_grant(&svc, "Trust", Priority::High, GrantStatus::Preparing).await;
        let reminder = add(&svc, grant.id, date(2025, 1, 5)).await;

        let first = svc.mark_reminder_sent(reminder.id).await.unwrap();
        let second = svc.mark_reminder_sent(reminder.id).await.unwrap();

        assert!(first.sent);
        assert!(first.email_sent_at.is_some());
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn mark_sent_unknown_is_not_found() {
        let (_dir, svc) = test_service().await;
        assert!(svc.mark_reminder_sent(5).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn create_for_unknown_grant_is_not_found() {
        let (_dir, svc) = test_service().await;
        let err = svc
            .create_reminder(
                77,
                &NewReminder {
                    reminder_type: ReminderType::Followup,
                    reminder_date: date(2025, 3, 1),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[tokio::test]
    async fn delete_reminder_removes_row() {
        let (_dir, svc) = test_service().await;
        let grant = seed_grant(&svc, "Trust", Priority::High, GrantStatus::Preparing).await;
        let reminder = add(&svc, grant.id, date(2025, 1, 5)).await;

        svc.delete_reminder(reminder.id).await.unwrap();
        assert!(svc.get_reminder(reminder.id).await.unwrap_err().is_not_found());
        assert!(svc.delete_reminder(reminder.id).await.unwrap_err().is_not_found());
    }
}
