use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::application::subjects::{CreateSubjectCommand, UpdateSubjectCommand};
use crate::domain::entities::SubjectRecord;
use crate::infra::http::{error::ApiError, models::SubjectPayload, state::AppState};

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<SubjectRecord>>, ApiError> {
    let subjects = state.subjects.list().await?;
    Ok(Json(subjects))
}

pub async fn find(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubjectRecord>, ApiError> {
    let subject = state
        .subjects
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Subject not found"))?;
    Ok(Json(subject))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<SubjectPayload>,
) -> Result<(StatusCode, Json<SubjectRecord>), ApiError> {
    let subject = state
        .subjects
        .create(CreateSubjectCommand {
            name: payload.name,
            description: payload.description,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(subject)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SubjectPayload>,
) -> Result<Json<SubjectRecord>, ApiError> {
    let subject = state
        .subjects
        .update(UpdateSubjectCommand {
            id,
            name: payload.name,
            description: payload.description,
        })
        .await?;
    Ok(Json(subject))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.subjects.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
