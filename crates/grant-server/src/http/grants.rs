use std::path::Path;

use axum::Json;
use axum::extract::State;
use grant_core::entities::Grant;
use grant_core::lifecycle::OutcomeSubmission;
use grant_db::updates::grant::GrantUpdate;

use super::{ApiJson, ApiPath, AppState, deleted};
use crate::error::ApiError;

pub(super) async fn list_grants(State(state): State<AppState>) -> Result<Json<Vec<Grant>>, ApiError> {
    Ok(Json(state.service.list_grants().await?))
}

pub(super) async fn get_grant(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Grant>, ApiError> {
    Ok(Json(state.service.get_grant(id).await?))
}

pub(super) async fn update_grant(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(update): ApiJson<GrantUpdate>,
) -> Result<Json<Grant>, ApiError> {
    let grant = state.service.update_grant(id, update).await?;
    tracing::info!(grant_id = id, "grant updated");
    Ok(Json(grant))
}

/// Rows go first; stored bytes of the grant's files are removed afterwards.
pub(super) async fn delete_grant(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let paths = state.service.delete_grant(id).await?;
    for path in &paths {
        state.uploads.remove_best_effort(Path::new(path)).await;
    }
    tracing::info!(grant_id = id, files = paths.len(), "grant deleted");
    Ok(deleted())
}

pub(super) async fn record_outcome(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(submission): ApiJson<OutcomeSubmission>,
) -> Result<Json<Grant>, ApiError> {
    let grant = state.service.record_outcome(id, submission).await?;
    tracing::info!(
        grant_id = id,
        status = %grant.status,
        "outcome recorded"
    );
    Ok(Json(grant))
}
