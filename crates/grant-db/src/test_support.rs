//! Shared test utilities for grant-db unit tests.

use grant_core::entities::{Grant, NewGrant};
use grant_core::enums::{GrantStatus, Priority};
use tempfile::TempDir;

use crate::GrantDb;
use crate::service::GrantService;

/// A service over a fresh database file. Keep the `TempDir` alive for the
/// duration of the test.
pub async fn test_service() -> (TempDir, GrantService) {
    let dir = tempfile::tempdir().unwrap();
    let db = GrantDb::open_local(dir.path().join("grants.db")).await.unwrap();
    (dir, GrantService::from_db(db))
}

/// Insert a grant with the given name, priority and status.
pub async fn seed_grant(
    svc: &GrantService,
    name: &str,
    priority: Priority,
    status: GrantStatus,
) -> Grant {
    svc.insert_grant(&NewGrant {
        priority: Some(priority),
        status: Some(status),
        ..NewGrant::named(name)
    })
    .await
    .unwrap()
}
