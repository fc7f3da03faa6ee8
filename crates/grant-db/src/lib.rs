//! # grant-db
//!
//! libSQL persistence for the grant tracker.
//!
//! Owns the relational state (grants, application files, communications,
//! reminders) and the rules that write it: the outcome lifecycle engine,
//! the upcoming-reminder query, dashboard aggregation and the monthly
//! strategy grouping.
//!
//! Every operation opens its own connection through [`GrantDb::connect`] and
//! drops it before returning, so a failed operation never leaves an open
//! transaction behind.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;
pub mod updates;

#[cfg(test)]
pub(crate) mod test_support;

use std::path::{Path, PathBuf};

use error::DatabaseError;
use libsql::Builder;

/// Milliseconds a connection waits on a locked database before failing.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Handle to the on-disk grant database.
///
/// Holds the opened `libsql::Database`; connections are created per
/// operation.
pub struct GrantDb {
    db: libsql::Database,
    path: PathBuf,
}

impl GrantDb {
    /// Open (or create) a local database file and run migrations.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        let path = path.as_ref().to_path_buf();
        let db = Builder::new_local(&path).build().await?;
        let grant_db = Self { db, path };
        grant_db.run_migrations().await?;
        tracing::debug!(path = %grant_db.path.display(), "grant database opened");
        Ok(grant_db)
    }

    /// Open a fresh connection with foreign keys enforced and a busy timeout.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the connection or its pragmas fail.
    pub async fn connect(&self) -> Result<libsql::Connection, DatabaseError> {
        let conn = self.db.connect()?;

        // Foreign keys must be enabled per connection in SQLite.
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Query(format!("PRAGMA foreign_keys: {e}")))?;

        // busy_timeout reports the new value as a row, so it goes through query().
        let mut rows = conn
            .query(&format!("PRAGMA busy_timeout = {BUSY_TIMEOUT_MS}"), ())
            .await
            .map_err(|e| DatabaseError::Query(format!("PRAGMA busy_timeout: {e}")))?;
        while rows.next().await?.is_some() {}

        Ok(conn)
    }

    /// Path of the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
