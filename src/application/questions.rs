use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::application::repos::{NewQuestion, QuestionsRepo, RepoError};
use crate::cache::CacheInvalidator;
use crate::domain::entities::QuestionRecord;

#[derive(Debug, Error)]
pub enum QuestionError {
    #[error("{0}")]
    Validation(&'static str),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone)]
pub struct CreateQuestionCommand {
    pub subtopic_id: Uuid,
    pub title: String,
    pub answer: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpdateQuestionCommand {
    pub id: Uuid,
    pub title: String,
    pub answer: Option<String>,
}

#[derive(Clone)]
pub struct QuestionService {
    repo: Arc<dyn QuestionsRepo>,
    invalidator: CacheInvalidator,
}

impl QuestionService {
    pub fn new(repo: Arc<dyn QuestionsRepo>, invalidator: CacheInvalidator) -> Self {
        Self { repo, invalidator }
    }

    pub async fn list_for_subtopic(
        &self,
        subtopic_id: Uuid,
    ) -> Result<Vec<QuestionRecord>, QuestionError> {
        self.repo
            .list_for_subtopic(subtopic_id)
            .await
            .map_err(QuestionError::from)
    }

    pub async fn create(
        &self,
        command: CreateQuestionCommand,
    ) -> Result<QuestionRecord, QuestionError> {
        let title = non_empty(&command.title, "question title must not be empty")?;
        let answer = command.answer.unwrap_or_default().trim().to_string();

        let question = self
            .repo
            .create(NewQuestion {
                subtopic_id: command.subtopic_id,
                title,
                answer,
            })
            .await?;

        // Subject rows derive question_count, so parent keys are purged too.
        self.invalidator
            .questions_changed(question.subject_id, question.subtopic_id)
            .await;
        Ok(question)
    }

    pub async fn update(
        &self,
        command: UpdateQuestionCommand,
    ) -> Result<QuestionRecord, QuestionError> {
        let title = non_empty(&command.title, "question title must not be empty")?;
        let answer = command.answer.unwrap_or_default().trim().to_string();

        let question = self.repo.update(command.id, title, answer).await?;

        self.invalidator
            .questions_changed(question.subject_id, question.subtopic_id)
            .await;
        Ok(question)
    }

    pub async fn delete(&self, id: Uuid) -> Result<QuestionRecord, QuestionError> {
        let question = self.repo.delete(id).await?;

        self.invalidator
            .questions_changed(question.subject_id, question.subtopic_id)
            .await;
        Ok(question)
    }
}

fn non_empty(value: &str, message: &'static str) -> Result<String, QuestionError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(QuestionError::Validation(message));
    }
    Ok(trimmed.to_string())
}
