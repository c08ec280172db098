use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::application::subtopics::{CreateSubtopicCommand, RenameSubtopicCommand};
use crate::domain::entities::SubtopicRecord;
use crate::infra::http::{
    error::ApiError,
    models::{SubtopicCreatePayload, SubtopicRenamePayload},
    state::AppState,
};

/// GET interprets the path id as the parent subject.
pub async fn list(
    State(state): State<AppState>,
    Path(subject_id): Path<Uuid>,
) -> Result<Json<Vec<SubtopicRecord>>, ApiError> {
    let subtopics = state.subtopics.list_for_subject(subject_id).await?;
    Ok(Json(subtopics))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<SubtopicCreatePayload>,
) -> Result<(StatusCode, Json<SubtopicRecord>), ApiError> {
    let subtopic = state
        .subtopics
        .create(CreateSubtopicCommand {
            subject_id: payload.subject_id,
            name: payload.name,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(subtopic)))
}

pub async fn rename(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SubtopicRenamePayload>,
) -> Result<Json<SubtopicRecord>, ApiError> {
    let subtopic = state
        .subtopics
        .rename(RenameSubtopicCommand {
            id,
            name: payload.name,
        })
        .await?;
    Ok(Json(subtopic))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.subtopics.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
