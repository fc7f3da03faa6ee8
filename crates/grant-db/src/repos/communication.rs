//! Communication repository.

use chrono::Utc;

use grant_core::entities::{Communication, NewCommunication};

use crate::error::DatabaseError;
use crate::helpers::{
    collect_rows, format_date, get_opt_string, parse_date, parse_datetime, parse_enum,
};
use crate::repos::grant::ensure_grant;
use crate::service::GrantService;

const SELECT_COLS: &str =
    "id, grant_id, date, type, direction, subject, summary, status, created_at";

fn row_to_communication(row: &libsql::Row) -> Result<Communication, DatabaseError> {
    Ok(Communication {
        id: row.get(0)?,
        grant_id: row.get(1)?,
        date: parse_date(&row.get::<String>(2)?)?,
        kind: parse_enum(&row.get::<String>(3)?)?,
        direction: parse_enum(&row.get::<String>(4)?)?,
        subject: get_opt_string(row, 5)?,
        summary: get_opt_string(row, 6)?,
        status: get_opt_string(row, 7)?,
        created_at: parse_datetime(&row.get::<String>(8)?)?,
    })
}

impl GrantService {
    pub async fn create_communication(
        &self,
        grant_id: i64,
        communication: &NewCommunication,
    ) -> Result<Communication, DatabaseError> {
        let conn = self.db().connect().await?;
        ensure_grant(&conn, grant_id).await?;

        conn.execute(
            "INSERT INTO communications \
             (grant_id, date, type, direction, subject, summary, status, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            libsql::params![
                grant_id,
                format_date(communication.date),
                communication.kind.as_str(),
                communication.direction.as_str(),
                communication.subject.as_deref(),
                communication.summary.as_deref(),
                communication.status.as_deref(),
                Utc::now().to_rfc3339()
            ],
        )
        .await?;

        let id = conn.last_insert_rowid();
        let mut rows = conn
            .query(
                &format!("SELECT {SELECT_COLS} FROM communications WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_communication(&row)
    }

    /// Communications of one grant, most recent date first; same-day entries
    /// newest first.
    pub async fn list_communications(
        &self,
        grant_id: i64,
    ) -> Result<Vec<Communication>, DatabaseError> {
        let conn = self.db().connect().await?;
        ensure_grant(&conn, grant_id).await?;
        let rows = conn
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM communications WHERE grant_id = ?1 \
                     ORDER BY date DESC, created_at DESC, id DESC"
                ),
                [grant_id],
            )
            .await?;
        collect_rows(rows, row_to_communication).await
    }

    pub async fn delete_communication(&self, id: i64) -> Result<(), DatabaseError> {
        let conn = self.db().connect().await?;
        let affected = conn
            .execute("DELETE FROM communications WHERE id = ?1", [id])
            .await?;
        if affected == 0 {
            return Err(DatabaseError::not_found("Communication", id));
        }
        Ok(())
    }
}
