use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::application::questions::{CreateQuestionCommand, UpdateQuestionCommand};
use crate::domain::entities::QuestionRecord;
use crate::infra::http::{
    error::ApiError,
    models::{QuestionCreatePayload, QuestionUpdatePayload},
    state::AppState,
};

/// GET interprets the path id as the parent subtopic.
pub async fn list(
    State(state): State<AppState>,
    Path(subtopic_id): Path<Uuid>,
) -> Result<Json<Vec<QuestionRecord>>, ApiError> {
    let questions = state.questions.list_for_subtopic(subtopic_id).await?;
    Ok(Json(questions))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<QuestionCreatePayload>,
) -> Result<(StatusCode, Json<QuestionRecord>), ApiError> {
    let question = state
        .questions
        .create(CreateQuestionCommand {
            subtopic_id: payload.subtopic_id,
            title: payload.title,
            answer: payload.answer,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(question)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<QuestionUpdatePayload>,
) -> Result<Json<QuestionRecord>, ApiError> {
    let question = state
        .questions
        .update(UpdateQuestionCommand {
            id,
            title: payload.title,
            answer: payload.answer,
        })
        .await?;
    Ok(Json(question))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.questions.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
