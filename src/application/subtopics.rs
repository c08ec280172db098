use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::application::repos::{NewSubtopic, RepoError, SubtopicsRepo};
use crate::cache::CacheInvalidator;
use crate::domain::entities::SubtopicRecord;

#[derive(Debug, Error)]
pub enum SubtopicError {
    #[error("{0}")]
    Validation(&'static str),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone)]
pub struct CreateSubtopicCommand {
    pub subject_id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct RenameSubtopicCommand {
    pub id: Uuid,
    pub name: String,
}

#[derive(Clone)]
pub struct SubtopicService {
    repo: Arc<dyn SubtopicsRepo>,
    invalidator: CacheInvalidator,
}

impl SubtopicService {
    pub fn new(repo: Arc<dyn SubtopicsRepo>, invalidator: CacheInvalidator) -> Self {
        Self { repo, invalidator }
    }

    pub async fn list_for_subject(
        &self,
        subject_id: Uuid,
    ) -> Result<Vec<SubtopicRecord>, SubtopicError> {
        self.repo
            .list_for_subject(subject_id)
            .await
            .map_err(SubtopicError::from)
    }

    pub async fn create(
        &self,
        command: CreateSubtopicCommand,
    ) -> Result<SubtopicRecord, SubtopicError> {
        let name = non_empty(&command.name, "subtopic name must not be empty")?;

        let subtopic = self
            .repo
            .create(NewSubtopic {
                subject_id: command.subject_id,
                name,
            })
            .await?;

        self.invalidator
            .subtopics_changed(subtopic.subject_id)
            .await;
        Ok(subtopic)
    }

    pub async fn rename(
        &self,
        command: RenameSubtopicCommand,
    ) -> Result<SubtopicRecord, SubtopicError> {
        let name = non_empty(&command.name, "subtopic name must not be empty")?;

        let subtopic = self.repo.rename(command.id, name).await?;

        self.invalidator
            .subtopics_changed(subtopic.subject_id)
            .await;
        Ok(subtopic)
    }

    pub async fn delete(&self, id: Uuid) -> Result<SubtopicRecord, SubtopicError> {
        let subtopic = self.repo.delete(id).await?;

        self.invalidator
            .subtopics_changed(subtopic.subject_id)
            .await;
        Ok(subtopic)
    }
}

fn non_empty(value: &str, message: &'static str) -> Result<String, SubtopicError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SubtopicError::Validation(message));
    }
    Ok(trimmed.to_string())
}
