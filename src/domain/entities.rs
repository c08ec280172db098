//! Domain entities mirrored from persistent storage.

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::types::ExperienceStatus;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectRecord {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Derived from the questions table; kept in sync by cache invalidation,
    /// never stored on the subject row itself.
    pub question_count: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubtopicRecord {
    pub id: Uuid,
    pub subject_id: Uuid,
    pub name: String,
    pub question_count: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionRecord {
    pub id: Uuid,
    pub subtopic_id: Uuid,
    pub subject_id: Uuid,
    pub title: String,
    pub answer: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperienceRecord {
    pub id: Uuid,
    pub author_name: String,
    pub company: String,
    pub role: String,
    pub content: String,
    pub status: ExperienceStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// One row per (user, question) pair; absence of a row means unread.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub question_id: Uuid,
    pub subject_id: Uuid,
    pub is_read: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub read_at: Option<OffsetDateTime>,
}
