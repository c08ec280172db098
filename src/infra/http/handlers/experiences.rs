use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::application::experiences::SubmitExperienceCommand;
use crate::domain::entities::ExperienceRecord;
use crate::infra::http::{error::ApiError, models::ExperiencePayload, state::AppState};

pub async fn list_public(
    State(state): State<AppState>,
) -> Result<Json<Vec<ExperienceRecord>>, ApiError> {
    let experiences = state.experiences.list_public().await?;
    Ok(Json(experiences))
}

pub async fn list_unpublished(
    State(state): State<AppState>,
) -> Result<Json<Vec<ExperienceRecord>>, ApiError> {
    let experiences = state.experiences.list_unpublished().await?;
    Ok(Json(experiences))
}

pub async fn submit(
    State(state): State<AppState>,
    Json(payload): Json<ExperiencePayload>,
) -> Result<(StatusCode, Json<ExperienceRecord>), ApiError> {
    let experience = state
        .experiences
        .submit(SubmitExperienceCommand {
            author_name: payload.author_name,
            company: payload.company,
            role: payload.role,
            content: payload.content,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(experience)))
}

pub async fn approve(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ExperienceRecord>, ApiError> {
    let experience = state.experiences.approve(id).await?;
    Ok(Json(experience))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.experiences.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
