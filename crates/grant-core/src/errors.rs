//! Cross-cutting error types for the grant tracker.
//!
//! Domain-specific errors (e.g., `DatabaseError`, `ApiError`) are defined in
//! their respective crates and convert from `CoreError`.

use thiserror::Error;

/// Errors that can be raised by any crate in the workspace.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("{entity_type} {id} not found")]
    NotFound { entity_type: String, id: String },

    /// Input failed validation (missing field, malformed date, bad range).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoreError {
    /// Shorthand for a `Validation` error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Shorthand for a `NotFound` error on an entity identified by `id`.
    pub fn not_found(entity_type: &str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        }
    }
}
