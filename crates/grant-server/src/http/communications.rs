use axum::Json;
use axum::extract::State;
use grant_core::entities::{Communication, NewCommunication};

use super::{ApiJson, ApiPath, AppState, deleted};
use crate::error::ApiError;

pub(super) async fn list_communications(
    State(state): State<AppState>,
    ApiPath(grant_id): ApiPath<i64>,
) -> Result<Json<Vec<Communication>>, ApiError> {
    Ok(Json(state.service.list_communications(grant_id).await?))
}

pub(super) async fn create_communication(
    State(state): State<AppState>,
    ApiPath(grant_id): ApiPath<i64>,
    ApiJson(communication): ApiJson<NewCommunication>,
) -> Result<Json<Communication>, ApiError> {
    let created = state
        .service
        .create_communication(grant_id, &communication)
        .await?;
    tracing::info!(grant_id, communication_id = created.id, "communication logged");
    Ok(Json(created))
}

pub(super) async fn delete_communication(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.service.delete_communication(id).await?;
    Ok(deleted())
}
