//! Repository traits and the data-layer error taxonomy.
//!
//! Services depend on these traits only; Postgres implementations live in
//! `infra::db` and tests substitute in-memory fakes.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::entities::{
    ExperienceRecord, QuestionRecord, SubjectRecord, SubtopicRecord,
};
use crate::domain::types::ExperienceStatus;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("duplicate record: {constraint}")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity constraint violated: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl RepoError {
    pub fn from_persistence(err: impl ToString) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct NewSubject {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct NewSubtopic {
    pub subject_id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub subtopic_id: Uuid,
    pub title: String,
    pub answer: String,
}

#[derive(Debug, Clone)]
pub struct NewExperience {
    pub author_name: String,
    pub company: String,
    pub role: String,
    pub content: String,
}

#[async_trait]
pub trait SubjectsRepo: Send + Sync {
    /// All subjects with derived `question_count`, ordered by name.
    async fn list(&self) -> Result<Vec<SubjectRecord>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<SubjectRecord>, RepoError>;

    async fn create(&self, subject: NewSubject) -> Result<SubjectRecord, RepoError>;

    async fn update(
        &self,
        id: Uuid,
        name: String,
        description: String,
    ) -> Result<SubjectRecord, RepoError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait SubtopicsRepo: Send + Sync {
    async fn list_for_subject(&self, subject_id: Uuid) -> Result<Vec<SubtopicRecord>, RepoError>;

    async fn create(&self, subtopic: NewSubtopic) -> Result<SubtopicRecord, RepoError>;

    async fn rename(&self, id: Uuid, name: String) -> Result<SubtopicRecord, RepoError>;

    /// Returns the deleted record so callers can invalidate parent keys.
    async fn delete(&self, id: Uuid) -> Result<SubtopicRecord, RepoError>;
}

#[async_trait]
pub trait QuestionsRepo: Send + Sync {
    async fn list_for_subtopic(&self, subtopic_id: Uuid)
    -> Result<Vec<QuestionRecord>, RepoError>;

    /// The subject id is resolved from the subtopic inside the insert.
    async fn create(&self, question: NewQuestion) -> Result<QuestionRecord, RepoError>;

    async fn update(
        &self,
        id: Uuid,
        title: String,
        answer: String,
    ) -> Result<QuestionRecord, RepoError>;

    async fn delete(&self, id: Uuid) -> Result<QuestionRecord, RepoError>;
}

#[async_trait]
pub trait ExperiencesRepo: Send + Sync {
    async fn list_by_status(
        &self,
        status: ExperienceStatus,
    ) -> Result<Vec<ExperienceRecord>, RepoError>;

    async fn create(&self, experience: NewExperience) -> Result<ExperienceRecord, RepoError>;

    /// Flips a pending experience to published. Idempotent on published rows.
    async fn approve(&self, id: Uuid) -> Result<ExperienceRecord, RepoError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait ProgressRepo: Send + Sync {
    /// Count of all questions in the subject, independent of any user.
    async fn count_questions(&self, subject_id: Uuid) -> Result<u64, RepoError>;

    /// Question ids the user has marked read within the subject.
    async fn completed_question_ids(
        &self,
        user_id: Uuid,
        subject_id: Uuid,
    ) -> Result<Vec<Uuid>, RepoError>;

    /// Insert-or-update keyed by the unique (user, question) pair; sets
    /// `is_read = true` and the read timestamp. Atomic at the database layer.
    async fn upsert_read(
        &self,
        user_id: Uuid,
        subject_id: Uuid,
        question_id: Uuid,
        read_at: OffsetDateTime,
    ) -> Result<(), RepoError>;

    /// Sets `is_read = false` on an existing record. Returns rows affected;
    /// zero when no record exists, which is not an error and must not create
    /// a record.
    async fn clear_read(&self, user_id: Uuid, question_id: Uuid) -> Result<u64, RepoError>;
}

#[async_trait]
pub trait HealthRepo: Send + Sync {
    async fn ping(&self) -> Result<(), RepoError>;
}
