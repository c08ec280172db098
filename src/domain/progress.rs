//! Per-subject reading progress aggregation.
//!
//! Pure computation over counts produced by the progress repository. The
//! (user, question) state machine has two states, {unread, read}; absence of
//! a record means unread and every transition is reversible.

use serde::Serialize;
use uuid::Uuid;

/// Aggregated reading progress for one user within one subject.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSummary {
    pub completed: u64,
    pub total: u64,
    pub percentage: f64,
    pub completed_question_ids: Vec<Uuid>,
}

impl ProgressSummary {
    /// Build a summary from the subject question total and the ids the user
    /// has marked read. An empty subject yields 0%, never a division error.
    pub fn compute(total: u64, completed_question_ids: Vec<Uuid>) -> Self {
        let completed = completed_question_ids.len() as u64;
        let percentage = if total > 0 {
            completed as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        Self {
            completed,
            total,
            percentage,
            completed_question_ids,
        }
    }
}
