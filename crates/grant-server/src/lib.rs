//! # grant-server
//!
//! JSON HTTP API for the grant tracker, built on axum.
//!
//! [`build_router`] wires every endpoint onto an [`AppState`] holding the
//! shared [`grant_db::service::GrantService`] and the upload directory. The
//! `grant-tracker` binary serves it and also runs the maintenance commands
//! (`init`, `import`, `check-files`).

pub mod error;
pub mod http;
pub mod maintenance;
pub mod storage;

pub use error::ApiError;
pub use http::{AppState, build_router};
pub use storage::UploadStore;
