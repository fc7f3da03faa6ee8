//! Router, shared state and the `/health` probe.

mod communications;
mod dashboard;
mod extract;
mod files;
mod grants;
mod middleware;
mod reminders;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{delete, get, patch, post};
use axum::{Json, response::IntoResponse};
use grant_config::GrantConfig;
use grant_db::service::GrantService;
use serde_json::json;

use crate::storage::UploadStore;

pub use extract::{ApiJson, ApiPath, ApiQuery};

/// Room for multipart boundaries and the metadata fields sent next to the
/// file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<GrantService>,
    pub uploads: Arc<UploadStore>,
    pub max_file_bytes: u64,
    pub cors_allow_origin: Arc<str>,
}

impl AppState {
    #[must_use]
    pub fn new(service: Arc<GrantService>, config: &GrantConfig) -> Self {
        Self {
            service,
            uploads: Arc::new(UploadStore::new(config.uploads.dir.clone())),
            max_file_bytes: config.uploads.max_file_bytes,
            cors_allow_origin: Arc::from(config.server.cors_allow_origin.as_str()),
        }
    }

    fn body_limit(&self) -> usize {
        usize::try_from(self.max_file_bytes)
            .unwrap_or(usize::MAX)
            .saturating_add(MULTIPART_OVERHEAD_BYTES)
    }
}

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/grants", get(grants::list_grants))
        .route(
            "/grants/:id",
            get(grants::get_grant)
                .patch(grants::update_grant)
                .delete(grants::delete_grant),
        )
        .route("/grants/:id/outcome", post(grants::record_outcome))
        .route(
            "/grants/:id/communications",
            get(communications::list_communications)
                .post(communications::create_communication),
        )
        .route(
            "/communications/:id",
            delete(communications::delete_communication),
        )
        .route(
            "/grants/:id/files",
            get(files::list_files).post(files::upload_file),
        )
        .route(
            "/files/:id",
            patch(files::update_file).delete(files::delete_file),
        )
        .route("/files/:id/download", get(files::download_file))
        .route(
            "/grants/:id/reminders",
            get(reminders::list_reminders).post(reminders::create_reminder),
        )
        .route("/reminders/upcoming", get(reminders::upcoming_reminders))
        .route("/reminders/:id/sent", patch(reminders::mark_sent))
        .route("/reminders/:id", delete(reminders::delete_reminder))
        .route("/dashboard/stats", get(dashboard::stats))
        .route("/strategy/monthly", get(dashboard::monthly_strategy));

    let body_limit = state.body_limit();
    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(from_fn_with_state(state.clone(), middleware::cors_middleware))
        .layer(from_fn(middleware::request_tracing_middleware))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Body returned by delete endpoints.
fn deleted() -> Json<serde_json::Value> {
    Json(json!({ "success": true }))
}
