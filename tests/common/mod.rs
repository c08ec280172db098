//! Shared fixtures: in-memory repositories and router construction.

use std::collections::HashMap;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header::CONTENT_TYPE},
};
use prepstack::application::repos::{
    ExperiencesRepo, HealthRepo, NewExperience, NewQuestion, NewSubject, NewSubtopic,
    ProgressRepo, QuestionsRepo, RepoError, SubjectsRepo, SubtopicsRepo,
};
use prepstack::application::{
    experiences::ExperienceService, progress::ProgressService, questions::QuestionService,
    subjects::SubjectService, subtopics::SubtopicService,
};
use prepstack::cache::{
    CacheBackend, CacheClient, CacheConfig, CacheError, CacheInvalidator, CacheState,
};
use prepstack::cache::MemoryBackend;
use prepstack::domain::entities::{
    ExperienceRecord, QuestionRecord, SubjectRecord, SubtopicRecord,
};
use prepstack::domain::types::ExperienceStatus;
use prepstack::infra::http::{AppState, build_router};
use serde_json::Value;
use time::OffsetDateTime;
use tower::ServiceExt;
use uuid::Uuid;

/// In-memory stand-in for the Postgres repositories, honoring the same
/// uniqueness and foreign-key rules. Read counters expose whether the cache
/// short-circuited a handler.
#[derive(Default)]
pub struct FakeRepos {
    subjects: Mutex<HashMap<Uuid, SubjectRecord>>,
    subtopics: Mutex<HashMap<Uuid, SubtopicRecord>>,
    questions: Mutex<HashMap<Uuid, QuestionRecord>>,
    experiences: Mutex<HashMap<Uuid, ExperienceRecord>>,
    progress: Mutex<HashMap<(Uuid, Uuid), (Uuid, bool)>>,
    pub subject_list_calls: AtomicUsize,
    pub subject_find_calls: AtomicUsize,
}

impl FakeRepos {
    pub fn seed_subject(&self, name: &str) -> SubjectRecord {
        let record = SubjectRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: String::new(),
            question_count: 0,
            created_at: OffsetDateTime::now_utc(),
        };
        self.subjects
            .lock()
            .unwrap()
            .insert(record.id, record.clone());
        record
    }

    pub fn seed_subtopic(&self, subject_id: Uuid, name: &str) -> SubtopicRecord {
        let record = SubtopicRecord {
            id: Uuid::new_v4(),
            subject_id,
            name: name.to_string(),
            question_count: 0,
            created_at: OffsetDateTime::now_utc(),
        };
        self.subtopics
            .lock()
            .unwrap()
            .insert(record.id, record.clone());
        record
    }

    pub fn seed_question(&self, subtopic: &SubtopicRecord, title: &str) -> QuestionRecord {
        let record = QuestionRecord {
            id: Uuid::new_v4(),
            subtopic_id: subtopic.id,
            subject_id: subtopic.subject_id,
            title: title.to_string(),
            answer: String::new(),
            created_at: OffsetDateTime::now_utc(),
        };
        self.questions
            .lock()
            .unwrap()
            .insert(record.id, record.clone());
        record
    }

    pub fn progress_record_count(&self) -> usize {
        self.progress.lock().unwrap().len()
    }

    fn question_count_for_subject(&self, subject_id: Uuid) -> i64 {
        self.questions
            .lock()
            .unwrap()
            .values()
            .filter(|q| q.subject_id == subject_id)
            .count() as i64
    }

    fn with_counts(&self, mut subject: SubjectRecord) -> SubjectRecord {
        subject.question_count = self.question_count_for_subject(subject.id);
        subject
    }
}

#[async_trait]
impl SubjectsRepo for FakeRepos {
    async fn list(&self) -> Result<Vec<SubjectRecord>, RepoError> {
        self.subject_list_calls.fetch_add(1, Ordering::SeqCst);
        let mut subjects: Vec<SubjectRecord> = self
            .subjects
            .lock()
            .unwrap()
            .values()
            .cloned()
            .collect();
        subjects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(subjects
            .into_iter()
            .map(|subject| self.with_counts(subject))
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<SubjectRecord>, RepoError> {
        self.subject_find_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .subjects
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .map(|subject| self.with_counts(subject)))
    }

    async fn create(&self, subject: NewSubject) -> Result<SubjectRecord, RepoError> {
        let mut subjects = self.subjects.lock().unwrap();
        if subjects.values().any(|s| s.name == subject.name) {
            return Err(RepoError::Duplicate {
                constraint: "subjects_name_key".to_string(),
            });
        }
        let record = SubjectRecord {
            id: Uuid::new_v4(),
            name: subject.name,
            description: subject.description,
            question_count: 0,
            created_at: OffsetDateTime::now_utc(),
        };
        subjects.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        id: Uuid,
        name: String,
        description: String,
    ) -> Result<SubjectRecord, RepoError> {
        let mut subjects = self.subjects.lock().unwrap();
        let record = subjects.get_mut(&id).ok_or(RepoError::NotFound)?;
        record.name = name;
        record.description = description;
        let updated = record.clone();
        drop(subjects);
        Ok(self.with_counts(updated))
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let removed = self.subjects.lock().unwrap().remove(&id);
        if removed.is_none() {
            return Err(RepoError::NotFound);
        }
        self.subtopics
            .lock()
            .unwrap()
            .retain(|_, t| t.subject_id != id);
        self.questions
            .lock()
            .unwrap()
            .retain(|_, q| q.subject_id != id);
        Ok(())
    }
}

#[async_trait]
impl SubtopicsRepo for FakeRepos {
    async fn list_for_subject(&self, subject_id: Uuid) -> Result<Vec<SubtopicRecord>, RepoError> {
        let questions = self.questions.lock().unwrap();
        let mut subtopics: Vec<SubtopicRecord> = self
            .subtopics
            .lock()
            .unwrap()
            .values()
            .filter(|t| t.subject_id == subject_id)
            .cloned()
            .map(|mut t| {
                t.question_count =
                    questions.values().filter(|q| q.subtopic_id == t.id).count() as i64;
                t
            })
            .collect();
        subtopics.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(subtopics)
    }

    async fn create(&self, subtopic: NewSubtopic) -> Result<SubtopicRecord, RepoError> {
        if !self
            .subjects
            .lock()
            .unwrap()
            .contains_key(&subtopic.subject_id)
        {
            return Err(RepoError::InvalidInput {
                message: "violates foreign key constraint subtopics_subject_id_fkey".to_string(),
            });
        }
        let mut subtopics = self.subtopics.lock().unwrap();
        if subtopics
            .values()
            .any(|t| t.subject_id == subtopic.subject_id && t.name == subtopic.name)
        {
            return Err(RepoError::Duplicate {
                constraint: "subtopics_subject_id_name_key".to_string(),
            });
        }
        let record = SubtopicRecord {
            id: Uuid::new_v4(),
            subject_id: subtopic.subject_id,
            name: subtopic.name,
            question_count: 0,
            created_at: OffsetDateTime::now_utc(),
        };
        subtopics.insert(record.id, record.clone());
        Ok(record)
    }

    async fn rename(&self, id: Uuid, name: String) -> Result<SubtopicRecord, RepoError> {
        let mut subtopics = self.subtopics.lock().unwrap();
        let record = subtopics.get_mut(&id).ok_or(RepoError::NotFound)?;
        record.name = name;
        Ok(record.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<SubtopicRecord, RepoError> {
        let record = self
            .subtopics
            .lock()
            .unwrap()
            .remove(&id)
            .ok_or(RepoError::NotFound)?;
        self.questions
            .lock()
            .unwrap()
            .retain(|_, q| q.subtopic_id != id);
        Ok(record)
    }
}

#[async_trait]
impl QuestionsRepo for FakeRepos {
    async fn list_for_subtopic(
        &self,
        subtopic_id: Uuid,
    ) -> Result<Vec<QuestionRecord>, RepoError> {
        let mut questions: Vec<QuestionRecord> = self
            .questions
            .lock()
            .unwrap()
            .values()
            .filter(|q| q.subtopic_id == subtopic_id)
            .cloned()
            .collect();
        questions.sort_by_key(|q| q.created_at);
        Ok(questions)
    }

    async fn create(&self, question: NewQuestion) -> Result<QuestionRecord, RepoError> {
        let subject_id = self
            .subtopics
            .lock()
            .unwrap()
            .get(&question.subtopic_id)
            .map(|t| t.subject_id)
            .ok_or(RepoError::NotFound)?;
        let record = QuestionRecord {
            id: Uuid::new_v4(),
            subtopic_id: question.subtopic_id,
            subject_id,
            title: question.title,
            answer: question.answer,
            created_at: OffsetDateTime::now_utc(),
        };
        self.questions
            .lock()
            .unwrap()
            .insert(record.id, record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        id: Uuid,
        title: String,
        answer: String,
    ) -> Result<QuestionRecord, RepoError> {
        let mut questions = self.questions.lock().unwrap();
        let record = questions.get_mut(&id).ok_or(RepoError::NotFound)?;
        record.title = title;
        record.answer = answer;
        Ok(record.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<QuestionRecord, RepoError> {
        self.questions
            .lock()
            .unwrap()
            .remove(&id)
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl ExperiencesRepo for FakeRepos {
    async fn list_by_status(
        &self,
        status: ExperienceStatus,
    ) -> Result<Vec<ExperienceRecord>, RepoError> {
        let mut experiences: Vec<ExperienceRecord> = self
            .experiences
            .lock()
            .unwrap()
            .values()
            .filter(|e| e.status == status)
            .cloned()
            .collect();
        experiences.sort_by_key(|e| e.created_at);
        experiences.reverse();
        Ok(experiences)
    }

    async fn create(&self, experience: NewExperience) -> Result<ExperienceRecord, RepoError> {
        let record = ExperienceRecord {
            id: Uuid::new_v4(),
            author_name: experience.author_name,
            company: experience.company,
            role: experience.role,
            content: experience.content,
            status: ExperienceStatus::Pending,
            created_at: OffsetDateTime::now_utc(),
        };
        self.experiences
            .lock()
            .unwrap()
            .insert(record.id, record.clone());
        Ok(record)
    }

    async fn approve(&self, id: Uuid) -> Result<ExperienceRecord, RepoError> {
        let mut experiences = self.experiences.lock().unwrap();
        let record = experiences.get_mut(&id).ok_or(RepoError::NotFound)?;
        record.status = ExperienceStatus::Published;
        Ok(record.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.experiences
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl ProgressRepo for FakeRepos {
    async fn count_questions(&self, subject_id: Uuid) -> Result<u64, RepoError> {
        Ok(self.question_count_for_subject(subject_id) as u64)
    }

    async fn completed_question_ids(
        &self,
        user_id: Uuid,
        subject_id: Uuid,
    ) -> Result<Vec<Uuid>, RepoError> {
        Ok(self
            .progress
            .lock()
            .unwrap()
            .iter()
            .filter(|((user, _), (subject, is_read))| {
                *user == user_id && *subject == subject_id && *is_read
            })
            .map(|((_, question), _)| *question)
            .collect())
    }

    async fn upsert_read(
        &self,
        user_id: Uuid,
        subject_id: Uuid,
        question_id: Uuid,
        _read_at: OffsetDateTime,
    ) -> Result<(), RepoError> {
        self.progress
            .lock()
            .unwrap()
            .insert((user_id, question_id), (subject_id, true));
        Ok(())
    }

    async fn clear_read(&self, user_id: Uuid, question_id: Uuid) -> Result<u64, RepoError> {
        let mut progress = self.progress.lock().unwrap();
        match progress.get_mut(&(user_id, question_id)) {
            Some((_, is_read)) if *is_read => {
                *is_read = false;
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}

#[async_trait]
impl HealthRepo for FakeRepos {
    async fn ping(&self) -> Result<(), RepoError> {
        Ok(())
    }
}

/// Backend whose every operation fails, for degradation tests.
pub struct FailingBackend;

#[async_trait]
impl CacheBackend for FailingBackend {
    async fn get(&self, _key: &str) -> Result<Option<Value>, CacheError> {
        Err(CacheError::Backend {
            message: "injected failure".to_string(),
        })
    }

    async fn set(&self, _key: &str, _value: &Value, _ttl: Duration) -> Result<(), CacheError> {
        Err(CacheError::Backend {
            message: "injected failure".to_string(),
        })
    }

    async fn del(&self, _key: &str) -> Result<(), CacheError> {
        Err(CacheError::Backend {
            message: "injected failure".to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

pub fn router_with_backend(repos: Arc<FakeRepos>, backend: Arc<dyn CacheBackend>) -> Router {
    let config = CacheConfig::default();
    router_with(repos, backend, &config)
}

pub fn router_with_config(repos: Arc<FakeRepos>, config: &CacheConfig) -> Router {
    let backend = Arc::new(MemoryBackend::new(config));
    router_with(repos, backend, config)
}

pub fn test_router(repos: Arc<FakeRepos>) -> Router {
    router_with_config(repos, &CacheConfig::default())
}

fn router_with(
    repos: Arc<FakeRepos>,
    backend: Arc<dyn CacheBackend>,
    config: &CacheConfig,
) -> Router {
    let client = CacheClient::new(backend, config);
    let invalidator = CacheInvalidator::new(client.clone());

    let state = AppState {
        subjects: SubjectService::new(repos.clone(), invalidator.clone()),
        subtopics: SubtopicService::new(repos.clone(), invalidator.clone()),
        questions: QuestionService::new(repos.clone(), invalidator.clone()),
        experiences: ExperienceService::new(repos.clone(), invalidator),
        progress: ProgressService::new(repos.clone()),
        health: repos,
    };

    build_router(state, CacheState { client })
}

pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 8 * 1024 * 1024)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}
