use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::application::progress::ProgressAction;
use crate::infra::http::{
    error::ApiError,
    models::{ProgressActionPayload, ProgressView, UnmarkView},
    state::AppState,
};

pub async fn summary(
    State(state): State<AppState>,
    Path((user_id, subject_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ProgressView>, ApiError> {
    let summary = state.progress.summary(user_id, subject_id).await?;
    Ok(Json(ProgressView::from(summary)))
}

pub async fn mark(
    State(state): State<AppState>,
    Json(payload): Json<ProgressActionPayload>,
) -> Result<StatusCode, ApiError> {
    state
        .progress
        .mark_read(ProgressAction {
            user_id: payload.user_id,
            subject_id: payload.subject_id,
            question_id: payload.question_id,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Unmarking an unread question is a no-op that still reports success.
pub async fn unmark(
    State(state): State<AppState>,
    Json(payload): Json<ProgressActionPayload>,
) -> Result<Json<UnmarkView>, ApiError> {
    let updated = state
        .progress
        .unmark(ProgressAction {
            user_id: payload.user_id,
            subject_id: payload.subject_id,
            question_id: payload.question_id,
        })
        .await?;
    Ok(Json(UnmarkView { updated }))
}
