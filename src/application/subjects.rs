use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::application::repos::{NewSubject, RepoError, SubjectsRepo};
use crate::cache::CacheInvalidator;
use crate::domain::entities::SubjectRecord;

#[derive(Debug, Error)]
pub enum SubjectError {
    #[error("{0}")]
    Validation(&'static str),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone)]
pub struct CreateSubjectCommand {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpdateSubjectCommand {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Clone)]
pub struct SubjectService {
    repo: Arc<dyn SubjectsRepo>,
    invalidator: CacheInvalidator,
}

impl SubjectService {
    pub fn new(repo: Arc<dyn SubjectsRepo>, invalidator: CacheInvalidator) -> Self {
        Self { repo, invalidator }
    }

    pub async fn list(&self) -> Result<Vec<SubjectRecord>, SubjectError> {
        self.repo.list().await.map_err(SubjectError::from)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<SubjectRecord>, SubjectError> {
        self.repo.find_by_id(id).await.map_err(SubjectError::from)
    }

    pub async fn create(&self, command: CreateSubjectCommand) -> Result<SubjectRecord, SubjectError> {
        let name = non_empty(&command.name, "subject name must not be empty")?;
        let description = command.description.unwrap_or_default().trim().to_string();

        let subject = self
            .repo
            .create(NewSubject { name, description })
            .await?;

        self.invalidator.subjects_changed(Some(subject.id)).await;
        Ok(subject)
    }

    pub async fn update(&self, command: UpdateSubjectCommand) -> Result<SubjectRecord, SubjectError> {
        let name = non_empty(&command.name, "subject name must not be empty")?;
        let description = command.description.unwrap_or_default().trim().to_string();

        let subject = self.repo.update(command.id, name, description).await?;

        self.invalidator.subjects_changed(Some(subject.id)).await;
        Ok(subject)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), SubjectError> {
        self.repo.delete(id).await?;
        self.invalidator.subjects_changed(Some(id)).await;
        Ok(())
    }
}

fn non_empty(value: &str, message: &'static str) -> Result<String, SubjectError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SubjectError::Validation(message));
    }
    Ok(trimmed.to_string())
}
