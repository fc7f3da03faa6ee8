//! Service handle that hosts every repository operation.
//!
//! `GrantService` wraps `GrantDb`. All repo methods are implemented as
//! `impl GrantService` blocks under [`crate::repos`], so callers hold one
//! handle (typically behind an `Arc`) for the lifetime of the process.

use std::path::Path;

use grant_config::DatabaseConfig;

use crate::GrantDb;
use crate::error::DatabaseError;

pub struct GrantService {
    db: GrantDb,
}

impl GrantService {
    /// Open a service over a local database file, running migrations.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or migrated.
    pub async fn new_local(db_path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        let db = GrantDb::open_local(db_path).await?;
        Ok(Self { db })
    }

    /// Open the database named in configuration.
    ///
    /// # Errors
    ///
    /// Same as [`Self::new_local`].
    pub async fn from_config(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        Self::new_local(&config.path).await
    }

    /// Create from an existing `GrantDb` (for testing).
    #[must_use]
    pub const fn from_db(db: GrantDb) -> Self {
        Self { db }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &GrantDb {
        &self.db
    }
}
