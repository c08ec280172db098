//! Cache key namespace.
//!
//! Every cached response lives under one of these keys. The `Display` form
//! is the wire string shared by both backends, so remote entries survive
//! process restarts.

use std::fmt;

use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Subject list with derived question counts.
    SubjectsAll,
    /// A single subject by id.
    Subject(Uuid),
    /// Subtopics of one subject.
    Subtopics(Uuid),
    /// Questions of one subtopic.
    Questions(Uuid),
    /// Published interview experiences.
    InterviewPublic,
    /// Moderation queue of pending experiences.
    InterviewUnpublished,
    /// Fallback key for cached routes without an explicit key, composed from
    /// the method and the full path-and-query.
    MethodPath { method: String, path: String },
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::SubjectsAll => write!(f, "subjects:all"),
            CacheKey::Subject(id) => write!(f, "subjects:{id}"),
            CacheKey::Subtopics(subject_id) => write!(f, "subtopics:{subject_id}"),
            CacheKey::Questions(subtopic_id) => write!(f, "questions:{subtopic_id}"),
            CacheKey::InterviewPublic => write!(f, "interview:public"),
            CacheKey::InterviewUnpublished => write!(f, "interview:unpublished"),
            CacheKey::MethodPath { method, path } => write!(f, "{method}:{path}"),
        }
    }
}
