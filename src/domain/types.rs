//! Shared domain enumerations aligned with persisted database enums.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "experience_status", rename_all = "snake_case")]
pub enum ExperienceStatus {
    Pending,
    Published,
}

impl ExperienceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ExperienceStatus::Pending => "pending",
            ExperienceStatus::Published => "published",
        }
    }
}
