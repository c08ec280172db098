use std::sync::Arc;

use crate::application::{
    experiences::ExperienceService, progress::ProgressService, questions::QuestionService,
    repos::HealthRepo, subjects::SubjectService, subtopics::SubtopicService,
};

/// Handler state. Services carry their own repository and invalidator
/// handles, so the state itself is cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    pub subjects: SubjectService,
    pub subtopics: SubtopicService,
    pub questions: QuestionService,
    pub experiences: ExperienceService,
    pub progress: ProgressService,
    pub health: Arc<dyn HealthRepo>,
}
