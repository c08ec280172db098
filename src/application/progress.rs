//! Progress aggregation service.
//!
//! Tracks per-(user, question) read state and aggregates it per subject.
//! There is no app-level locking: concurrent mark-read calls for the same
//! pair race safely because the repository upsert is atomic under the unique
//! (user, question) constraint.

use std::sync::Arc;

use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{ProgressRepo, RepoError};
use crate::domain::progress::ProgressSummary;

#[derive(Debug, Error)]
pub enum ProgressError {
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Identifies one (user, subject, question) mark/unmark action.
#[derive(Debug, Clone, Copy)]
pub struct ProgressAction {
    pub user_id: Uuid,
    pub subject_id: Uuid,
    pub question_id: Uuid,
}

#[derive(Clone)]
pub struct ProgressService {
    repo: Arc<dyn ProgressRepo>,
}

impl ProgressService {
    pub fn new(repo: Arc<dyn ProgressRepo>) -> Self {
        Self { repo }
    }

    pub async fn summary(
        &self,
        user_id: Uuid,
        subject_id: Uuid,
    ) -> Result<ProgressSummary, ProgressError> {
        let total = self.repo.count_questions(subject_id).await?;
        let completed_ids = self
            .repo
            .completed_question_ids(user_id, subject_id)
            .await?;

        Ok(ProgressSummary::compute(total, completed_ids))
    }

    /// Idempotent: re-marking an already-read question succeeds and changes
    /// nothing except the read timestamp.
    pub async fn mark_read(&self, action: ProgressAction) -> Result<(), ProgressError> {
        self.repo
            .upsert_read(
                action.user_id,
                action.subject_id,
                action.question_id,
                OffsetDateTime::now_utc(),
            )
            .await
            .map_err(ProgressError::from)
    }

    /// Returns rows affected. Zero means the question was never marked;
    /// that is a successful no-op, not an error, and no record is created.
    pub async fn unmark(&self, action: ProgressAction) -> Result<u64, ProgressError> {
        self.repo
            .clear_read(action.user_id, action.question_id)
            .await
            .map_err(ProgressError::from)
    }
}
