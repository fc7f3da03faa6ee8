//! Repository modules implementing every grant-tracker operation.
//!
//! Each module adds methods to `GrantService` via `impl GrantService` blocks.

pub mod communication;
pub mod dashboard;
pub mod file;
pub mod grant;
pub mod outcome;
pub mod reminder;
pub mod strategy;
