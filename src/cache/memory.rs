//! In-process cache backend.
//!
//! Bounded LRU map with per-entry expiry deadlines. Used when no remote
//! store is configured. Values stay native `serde_json::Value`s; nothing is
//! re-serialized on the local path.

use std::sync::RwLock;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lru::LruCache;
use serde_json::Value;

use super::backend::{CacheBackend, CacheError};
use super::config::CacheConfig;
use super::lock::{rw_read, rw_write};

const SOURCE: &str = "cache::memory";

struct MemoryEntry {
    expires_at: Option<Instant>,
    value: Value,
}

impl MemoryEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| deadline <= now)
    }
}

pub struct MemoryBackend {
    entries: RwLock<LruCache<String, MemoryEntry>>,
}

impl MemoryBackend {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: RwLock::new(LruCache::new(config.memory_entry_limit_non_zero())),
        }
    }

    pub fn len(&self) -> usize {
        rw_read(&self.entries, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<Value>, CacheError> {
        let now = Instant::now();
        let mut entries = rw_write(&self.entries, SOURCE, "get");

        match entries.get(key) {
            Some(entry) if entry.is_expired(now) => {
                entries.pop(key);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &Value, ttl: Duration) -> Result<(), CacheError> {
        if ttl.is_zero() {
            return Ok(());
        }

        let entry = MemoryEntry {
            expires_at: Instant::now().checked_add(ttl),
            value: value.clone(),
        };
        rw_write(&self.entries, SOURCE, "set").put(key.to_string(), entry);
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<(), CacheError> {
        rw_write(&self.entries, SOURCE, "del").pop(key);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn backend() -> MemoryBackend {
        MemoryBackend::new(&CacheConfig::default())
    }

    #[tokio::test]
    async fn missing_key_reads_as_none() {
        let cache = backend();
        assert!(cache.get("subjects:all").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn set_then_get_roundtrips_deep_equal() {
        let cache = backend();
        let value = json!({"subjects": [{"name": "Networks", "question_count": 12}]});

        cache
            .set("subjects:all", &value, Duration::from_secs(60))
            .await
            .unwrap();

        let cached = cache.get("subjects:all").await.unwrap().expect("cached");
        assert_eq!(cached, value);
    }

    #[tokio::test]
    async fn entries_expire_after_ttl() {
        let cache = backend();
        cache
            .set("subjects:all", &json!([1, 2, 3]), Duration::from_millis(20))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(40)).await;

        assert!(cache.get("subjects:all").await.unwrap().is_none());
        // Lazy expiry also removes the entry.
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn zero_ttl_stores_nothing() {
        let cache = backend();
        cache
            .set("subjects:all", &json!("x"), Duration::ZERO)
            .await
            .unwrap();

        assert!(cache.get("subjects:all").await.unwrap().is_none());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn del_is_idempotent() {
        let cache = backend();
        cache
            .set("interview:public", &json!([]), Duration::from_secs(60))
            .await
            .unwrap();

        cache.del("interview:public").await.unwrap();
        cache.del("interview:public").await.unwrap();

        assert!(cache.get("interview:public").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn overwrite_replaces_previous_value() {
        let cache = backend();
        cache
            .set("subjects:all", &json!(1), Duration::from_secs(60))
            .await
            .unwrap();
        cache
            .set("subjects:all", &json!(2), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(cache.get("subjects:all").await.unwrap(), Some(json!(2)));
    }

    #[tokio::test]
    async fn lru_evicts_oldest_entry_at_capacity() {
        let config = CacheConfig {
            memory_entry_limit: 2,
            ..Default::default()
        };
        let cache = MemoryBackend::new(&config);
        let ttl = Duration::from_secs(60);

        cache.set("a", &json!(1), ttl).await.unwrap();
        cache.set("b", &json!(2), ttl).await.unwrap();
        cache.set("c", &json!(3), ttl).await.unwrap();

        assert!(cache.get("a").await.unwrap().is_none());
        assert!(cache.get("b").await.unwrap().is_some());
        assert!(cache.get("c").await.unwrap().is_some());
    }
}
