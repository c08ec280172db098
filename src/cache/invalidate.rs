//! Cache invalidation service.
//!
//! One named operation per resource family, invoked synchronously after a
//! successful write. Each operation deletes a fixed, enumerable key set:
//! the specific-item keys when identifiable plus every list key whose
//! payload derives from the changed rows. Deletion is best-effort relative
//! to write durability; failures are logged inside `CacheClient` and never
//! roll back the triggering mutation.

use metrics::counter;
use tracing::debug;
use uuid::Uuid;

use super::client::CacheClient;
use super::keys::CacheKey;

#[derive(Clone)]
pub struct CacheInvalidator {
    client: CacheClient,
}

impl CacheInvalidator {
    pub fn new(client: CacheClient) -> Self {
        Self { client }
    }

    /// A subject was created, updated, or deleted.
    pub async fn subjects_changed(&self, id: Option<Uuid>) {
        let mut keys = vec![CacheKey::SubjectsAll];
        if let Some(id) = id {
            keys.push(CacheKey::Subject(id));
        }
        self.purge("subjects", &keys).await;
    }

    /// A subtopic under `subject_id` changed. The subject list carries a
    /// derived question count, so parent keys go too.
    pub async fn subtopics_changed(&self, subject_id: Uuid) {
        self.purge(
            "subtopics",
            &[
                CacheKey::Subtopics(subject_id),
                CacheKey::SubjectsAll,
                CacheKey::Subject(subject_id),
            ],
        )
        .await;
    }

    /// A question under `subtopic_id` of `subject_id` changed. Subject rows
    /// derive `question_count` from questions, so the subject keys go too.
    pub async fn questions_changed(&self, subject_id: Uuid, subtopic_id: Uuid) {
        self.purge(
            "questions",
            &[
                CacheKey::Questions(subtopic_id),
                CacheKey::Subtopics(subject_id),
                CacheKey::SubjectsAll,
                CacheKey::Subject(subject_id),
            ],
        )
        .await;
    }

    /// An interview experience was submitted, approved, or deleted. Both the
    /// public list and the moderation queue change shape.
    pub async fn experiences_changed(&self) {
        self.purge(
            "experiences",
            &[CacheKey::InterviewPublic, CacheKey::InterviewUnpublished],
        )
        .await;
    }

    async fn purge(&self, family: &'static str, keys: &[CacheKey]) {
        for key in keys {
            self.client.del(key).await;
            counter!("prepstack_cache_invalidation_total").increment(1);
        }
        debug!(family, count = keys.len(), "cache keys invalidated");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;

    use super::super::config::CacheConfig;
    use super::super::memory::MemoryBackend;
    use super::*;

    fn client_with_backend() -> (CacheClient, Arc<MemoryBackend>) {
        let config = CacheConfig::default();
        let backend = Arc::new(MemoryBackend::new(&config));
        (CacheClient::new(backend.clone(), &config), backend)
    }

    async fn seed(client: &CacheClient, keys: &[CacheKey]) {
        for key in keys {
            client
                .set(key, &json!({"seeded": true}), Duration::from_secs(600))
                .await;
        }
    }

    #[tokio::test]
    async fn subtopic_change_purges_parent_subject_keys() {
        let (client, _) = client_with_backend();
        let subject_id = Uuid::new_v4();
        let seeded = [
            CacheKey::SubjectsAll,
            CacheKey::Subject(subject_id),
            CacheKey::Subtopics(subject_id),
        ];
        seed(&client, &seeded).await;

        CacheInvalidator::new(client.clone())
            .subtopics_changed(subject_id)
            .await;

        for key in &seeded {
            assert!(client.get(key).await.is_none(), "stale key: {key}");
        }
    }

    #[tokio::test]
    async fn subject_change_leaves_unrelated_keys() {
        let (client, _) = client_with_backend();
        let other = Uuid::new_v4();
        seed(
            &client,
            &[CacheKey::SubjectsAll, CacheKey::Subtopics(other)],
        )
        .await;

        CacheInvalidator::new(client.clone())
            .subjects_changed(None)
            .await;

        assert!(client.get(&CacheKey::SubjectsAll).await.is_none());
        assert!(client.get(&CacheKey::Subtopics(other)).await.is_some());
    }

    #[tokio::test]
    async fn experience_change_purges_both_lists() {
        let (client, _) = client_with_backend();
        seed(
            &client,
            &[CacheKey::InterviewPublic, CacheKey::InterviewUnpublished],
        )
        .await;

        CacheInvalidator::new(client.clone())
            .experiences_changed()
            .await;

        assert!(client.get(&CacheKey::InterviewPublic).await.is_none());
        assert!(client.get(&CacheKey::InterviewUnpublished).await.is_none());
    }

    #[tokio::test]
    async fn question_change_purges_derived_counts() {
        let (client, _) = client_with_backend();
        let subject_id = Uuid::new_v4();
        let subtopic_id = Uuid::new_v4();
        let seeded = [
            CacheKey::Questions(subtopic_id),
            CacheKey::Subtopics(subject_id),
            CacheKey::SubjectsAll,
            CacheKey::Subject(subject_id),
        ];
        seed(&client, &seeded).await;

        CacheInvalidator::new(client.clone())
            .questions_changed(subject_id, subtopic_id)
            .await;

        for key in &seeded {
            assert!(client.get(key).await.is_none(), "stale key: {key}");
        }
    }
}
