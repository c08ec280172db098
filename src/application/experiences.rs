use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::application::repos::{ExperiencesRepo, NewExperience, RepoError};
use crate::cache::CacheInvalidator;
use crate::domain::entities::ExperienceRecord;
use crate::domain::types::ExperienceStatus;

#[derive(Debug, Error)]
pub enum ExperienceError {
    #[error("{0}")]
    Validation(&'static str),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone)]
pub struct SubmitExperienceCommand {
    pub author_name: String,
    pub company: String,
    pub role: String,
    pub content: String,
}

#[derive(Clone)]
pub struct ExperienceService {
    repo: Arc<dyn ExperiencesRepo>,
    invalidator: CacheInvalidator,
}

impl ExperienceService {
    pub fn new(repo: Arc<dyn ExperiencesRepo>, invalidator: CacheInvalidator) -> Self {
        Self { repo, invalidator }
    }

    pub async fn list_public(&self) -> Result<Vec<ExperienceRecord>, ExperienceError> {
        self.repo
            .list_by_status(ExperienceStatus::Published)
            .await
            .map_err(ExperienceError::from)
    }

    /// The moderation queue: submissions awaiting approval.
    pub async fn list_unpublished(&self) -> Result<Vec<ExperienceRecord>, ExperienceError> {
        self.repo
            .list_by_status(ExperienceStatus::Pending)
            .await
            .map_err(ExperienceError::from)
    }

    pub async fn submit(
        &self,
        command: SubmitExperienceCommand,
    ) -> Result<ExperienceRecord, ExperienceError> {
        let author_name = non_empty(&command.author_name, "author name must not be empty")?;
        let company = non_empty(&command.company, "company must not be empty")?;
        let role = non_empty(&command.role, "role must not be empty")?;
        let content = non_empty(&command.content, "content must not be empty")?;

        let experience = self
            .repo
            .create(NewExperience {
                author_name,
                company,
                role,
                content,
            })
            .await?;

        self.invalidator.experiences_changed().await;
        Ok(experience)
    }

    pub async fn approve(&self, id: Uuid) -> Result<ExperienceRecord, ExperienceError> {
        let experience = self.repo.approve(id).await?;
        self.invalidator.experiences_changed().await;
        Ok(experience)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ExperienceError> {
        self.repo.delete(id).await?;
        self.invalidator.experiences_changed().await;
        Ok(())
    }
}

fn non_empty(value: &str, message: &'static str) -> Result<String, ExperienceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ExperienceError::Validation(message));
    }
    Ok(trimmed.to_string())
}
