use axum::Json;
use axum::extract::State;
use chrono::{NaiveDate, Utc};
use grant_core::entities::{NewReminder, Reminder, ReminderWithGrant};
use serde::Deserialize;

use super::{ApiJson, ApiPath, ApiQuery, AppState, deleted};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub(super) struct UpcomingQuery {
    /// Defaults to today (UTC).
    as_of: Option<NaiveDate>,
}

pub(super) async fn upcoming_reminders(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<UpcomingQuery>,
) -> Result<Json<Vec<ReminderWithGrant>>, ApiError> {
    let as_of = query.as_of.unwrap_or_else(|| Utc::now().date_naive());
    Ok(Json(state.service.due_reminders(as_of).await?))
}

pub(super) async fn mark_sent(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Reminder>, ApiError> {
    Ok(Json(state.service.mark_reminder_sent(id).await?))
}

pub(super) async fn list_reminders(
    State(state): State<AppState>,
    ApiPath(grant_id): ApiPath<i64>,
) -> Result<Json<Vec<Reminder>>, ApiError> {
    Ok(Json(state.service.list_reminders_for_grant(grant_id).await?))
}

pub(super) async fn create_reminder(
    State(state): State<AppState>,
    ApiPath(grant_id): ApiPath<i64>,
    ApiJson(reminder): ApiJson<NewReminder>,
) -> Result<Json<Reminder>, ApiError> {
    let created = state.service.create_reminder(grant_id, &reminder).await?;
    tracing::info!(
        grant_id,
        reminder_id = created.id,
        reminder_date = %created.reminder_date,
        "reminder scheduled"
    );
    Ok(Json(created))
}

pub(super) async fn delete_reminder(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.service.delete_reminder(id).await?;
    Ok(deleted())
}
