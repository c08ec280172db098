//! Request and response payloads for the JSON API.
//!
//! Request bodies accept camelCase field names; records serialize with their
//! stored snake_case fields. The progress view keeps its historical mixed
//! casing because existing clients bind to those exact names.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::progress::ProgressSummary;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectPayload {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtopicCreatePayload {
    pub subject_id: Uuid,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct SubtopicRenamePayload {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionCreatePayload {
    pub subtopic_id: Uuid,
    pub title: String,
    pub answer: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct QuestionUpdatePayload {
    pub title: String,
    pub answer: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperiencePayload {
    pub author_name: String,
    pub company: String,
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressActionPayload {
    pub user_id: Uuid,
    pub subject_id: Uuid,
    pub question_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ProgressView {
    #[serde(rename = "completedQ")]
    pub completed: u64,
    #[serde(rename = "totalQ")]
    pub total: u64,
    pub progress: f64,
    pub completed_questions: Vec<Uuid>,
}

impl From<ProgressSummary> for ProgressView {
    fn from(summary: ProgressSummary) -> Self {
        Self {
            completed: summary.completed,
            total: summary.total,
            progress: summary.percentage,
            completed_questions: summary.completed_question_ids,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UnmarkView {
    pub updated: u64,
}
