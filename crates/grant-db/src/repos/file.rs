//! Application file metadata repository.
//!
//! Rows only reference stored bytes by path; writing and removing the bytes
//! is the caller's concern.

use chrono::Utc;

use grant_core::entities::{ApplicationFile, NewApplicationFile};

use crate::error::DatabaseError;
use crate::helpers::{collect_rows, get_bool, get_opt_string, parse_datetime, parse_enum};
use crate::repos::grant::ensure_grant;
use crate::service::GrantService;
use crate::updates::file::FileUpdate;

const SELECT_COLS: &str = "id, grant_id, file_name, file_path, file_type, file_size, \
     version_label, is_final, notes, file_category, file_subcategory, uploaded_at";

fn row_to_file(row: &libsql::Row) -> Result<ApplicationFile, DatabaseError> {
    Ok(ApplicationFile {
        id: row.get(0)?,
        grant_id: row.get(1)?,
        file_name: row.get(2)?,
        file_path: row.get(3)?,
        file_type: get_opt_string(row, 4)?,
        file_size: row.get::<Option<i64>>(5)?,
        version_label: get_opt_string(row, 6)?,
        is_final: get_bool(row, 7)?,
        notes: get_opt_string(row, 8)?,
        file_category: parse_enum(&row.get::<String>(9)?)?,
        file_subcategory: get_opt_string(row, 10)?,
        uploaded_at: parse_datetime(&row.get::<String>(11)?)?,
    })
}

async fn fetch_file(
    conn: &libsql::Connection,
    id: i64,
) -> Result<Option<ApplicationFile>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {SELECT_COLS} FROM application_files WHERE id = ?1"),
            [id],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_file(&row)?)),
        None => Ok(None),
    }
}

impl GrantService {
    /// Record metadata for bytes already written to `file.file_path`.
    pub async fn insert_file(
        &self,
        grant_id: i64,
        file: &NewApplicationFile,
    ) -> Result<ApplicationFile, DatabaseError> {
        let conn = self.db().connect().await?;
        ensure_grant(&conn, grant_id).await?;

        conn.execute(
            "INSERT INTO application_files (grant_id, file_name, file_path, file_type, \
             file_size, version_label, is_final, notes, file_category, file_subcategory, \
             uploaded_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            libsql::params![
                grant_id,
                file.file_name.as_str(),
                file.file_path.as_str(),
                file.file_type.as_deref(),
                file.file_size,
                file.version_label.as_deref(),
                i64::from(file.is_final),
                file.notes.as_deref(),
                file.file_category.as_str(),
                file.file_subcategory.as_deref(),
                Utc::now().to_rfc3339()
            ],
        )
        .await?;

        let id = conn.last_insert_rowid();
        fetch_file(&conn, id).await?.ok_or(DatabaseError::NoResult)
    }

    pub async fn get_file(&self, id: i64) -> Result<ApplicationFile, DatabaseError> {
        let conn = self.db().connect().await?;
        fetch_file(&conn, id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("File", id))
    }

    /// Files of one grant, newest upload first.
    pub async fn list_files(&self, grant_id: i64) -> Result<Vec<ApplicationFile>, DatabaseError> {
        let conn = self.db().connect().await?;
        ensure_grant(&conn, grant_id).await?;
        let rows = conn
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM application_files WHERE grant_id = ?1 \
                     ORDER BY uploaded_at DESC, id DESC"
                ),
                [grant_id],
            )
            .await?;
        collect_rows(rows, row_to_file).await
    }

    /// Change only the metadata fields present in `update`.
    pub async fn update_file(
        &self,
        id: i64,
        update: FileUpdate,
    ) -> Result<ApplicationFile, DatabaseError> {
        let conn = self.db().connect().await?;
        if update.is_empty() {
            return fetch_file(&conn, id)
                .await?
                .ok_or_else(|| DatabaseError::not_found("File", id));
        }

        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(version_label) = update.version_label {
            sets.push(format!("version_label = ?{idx}"));
            params.push(version_label.into());
            idx += 1;
        }
        if let Some(is_final) = update.is_final {
            sets.push(format!("is_final = ?{idx}"));
            params.push(i64::from(is_final).into());
            idx += 1;
        }
        if let Some(notes) = update.notes {
            sets.push(format!("notes = ?{idx}"));
            params.push(notes.into());
            idx += 1;
        }
        if let Some(category) = update.file_category {
            sets.push(format!("file_category = ?{idx}"));
            params.push(category.as_str().into());
            idx += 1;
        }
        if let Some(subcategory) = update.file_subcategory {
            sets.push(format!("file_subcategory = ?{idx}"));
            params.push(subcategory.into());
            idx += 1;
        }

        params.push(id.into());
        let sql = format!(
            "UPDATE application_files SET {} WHERE id = ?{idx}",
            sets.join(", ")
        );
        let affected = conn
            .execute(&sql, libsql::params_from_iter(params))
            .await?;
        if affected == 0 {
            return Err(DatabaseError::not_found("File", id));
        }

        fetch_file(&conn, id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("File", id))
    }

    /// Delete a file row and return it, so the caller can remove the bytes.
    pub async fn delete_file(&self, id: i64) -> Result<ApplicationFile, DatabaseError> {
        let conn = self.db().connect().await?;
        let mut rows = conn
            .query(
                &format!("DELETE FROM application_files WHERE id = ?1 RETURNING {SELECT_COLS}"),
                [id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => row_to_file(&row),
            None => Err(DatabaseError::not_found("File", id)),
        }
    }

    /// Every stored path with its row id, for reconciliation against disk.
    pub async fn list_file_paths(&self) -> Result<Vec<(i64, String)>, DatabaseError> {
        let conn = self.db().connect().await?;
        let rows = conn
            .query("SELECT id, file_path FROM application_files ORDER BY id", ())
            .await?;
        collect_rows(rows, |row| Ok((row.get::<i64>(0)?, row.get::<String>(1)?))).await
    }
}
