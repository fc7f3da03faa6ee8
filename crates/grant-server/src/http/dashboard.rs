use axum::Json;
use axum::extract::State;
use grant_core::entities::{DashboardStats, MonthGroup};

use super::AppState;
use crate::error::ApiError;

pub(super) async fn stats(State(state): State<AppState>) -> Result<Json<DashboardStats>, ApiError> {
    Ok(Json(state.service.compute_stats().await?))
}

pub(super) async fn monthly_strategy(
    State(state): State<AppState>,
) -> Result<Json<Vec<MonthGroup>>, ApiError> {
    Ok(Json(state.service.monthly_strategy().await?))
}
