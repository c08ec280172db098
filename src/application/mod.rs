//! Application services: validation, orchestration, cache invalidation.

pub mod error;
pub mod experiences;
pub mod progress;
pub mod questions;
pub mod repos;
pub mod subjects;
pub mod subtopics;
