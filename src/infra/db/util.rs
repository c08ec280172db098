//! Translation from sqlx/Postgres failures to the repository taxonomy.

use sqlx::error::DatabaseError;

use crate::application::repos::RepoError;

// SQLSTATE codes this schema can raise.
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const NOT_NULL_VIOLATION: &str = "23502";
const CHECK_VIOLATION: &str = "23514";
const QUERY_CANCELED: &str = "57014";

pub fn map_sqlx_error(err: sqlx::Error) -> RepoError {
    match err {
        sqlx::Error::RowNotFound => RepoError::NotFound,
        sqlx::Error::Database(db) => match db.code().as_deref() {
            Some(UNIQUE_VIOLATION) => RepoError::Duplicate {
                constraint: db.constraint().unwrap_or("unknown").to_string(),
            },
            Some(FOREIGN_KEY_VIOLATION) => RepoError::InvalidInput {
                message: db
                    .constraint()
                    .and_then(describe_foreign_key)
                    .map(str::to_string)
                    .unwrap_or_else(|| db.message().to_string()),
            },
            // Class 22, data exceptions: malformed uuid text and the like.
            Some(code) if code.starts_with("22") => RepoError::InvalidInput {
                message: db.message().to_string(),
            },
            Some(NOT_NULL_VIOLATION) | Some(CHECK_VIOLATION) => RepoError::Integrity {
                message: db.message().to_string(),
            },
            Some(QUERY_CANCELED) => RepoError::Timeout,
            _ => RepoError::from_persistence(db.message()),
        },
        other => RepoError::from_persistence(other),
    }
}

/// Readable wording for the schema's foreign keys, so API hints name the
/// missing parent instead of a Postgres identifier.
fn describe_foreign_key(constraint: &str) -> Option<&'static str> {
    match constraint {
        "subtopics_subject_id_fkey" | "questions_subject_id_fkey"
        | "user_progress_subject_id_fkey" => Some("the referenced subject does not exist"),
        "questions_subtopic_id_fkey" => Some("the referenced subtopic does not exist"),
        "user_progress_question_id_fkey" => Some("the referenced question does not exist"),
        _ => None,
    }
}
