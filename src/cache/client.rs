//! Cache client: the only cache surface the application layer touches.
//!
//! Absorbs every backend error at this boundary. A failed read is a miss, a
//! failed write or delete is a logged no-op; nothing cache-related can
//! surface as a request error.

use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use serde_json::Value;
use tracing::{debug, warn};

use super::backend::CacheBackend;
use super::config::CacheConfig;
use super::keys::CacheKey;

#[derive(Clone)]
pub struct CacheClient {
    backend: Arc<dyn CacheBackend>,
    enabled: bool,
    default_ttl: Duration,
}

impl CacheClient {
    pub fn new(backend: Arc<dyn CacheBackend>, config: &CacheConfig) -> Self {
        Self {
            backend,
            enabled: config.enabled,
            default_ttl: config.default_ttl(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Look up a key. Missing, expired, disabled, and backend failure all
    /// read as `None`.
    pub async fn get(&self, key: &CacheKey) -> Option<Value> {
        if !self.enabled {
            return None;
        }

        match self.backend.get(&key.to_string()).await {
            Ok(Some(value)) => {
                counter!("prepstack_cache_hit_total").increment(1);
                Some(value)
            }
            Ok(None) => {
                counter!("prepstack_cache_miss_total").increment(1);
                None
            }
            Err(error) => {
                counter!("prepstack_cache_backend_error_total").increment(1);
                warn!(
                    cache_key = %key,
                    backend = self.backend.name(),
                    error = %error,
                    "cache get failed; treating as miss"
                );
                None
            }
        }
    }

    /// Store a value under a key. A zero TTL means "do not cache" and is
    /// filtered here so both backends agree.
    pub async fn set(&self, key: &CacheKey, value: &Value, ttl: Duration) {
        if !self.enabled {
            return;
        }

        if ttl.is_zero() {
            debug!(cache_key = %key, "zero ttl; skipping cache store");
            return;
        }

        match self.backend.set(&key.to_string(), value, ttl).await {
            Ok(()) => {
                counter!("prepstack_cache_store_total").increment(1);
            }
            Err(error) => {
                counter!("prepstack_cache_backend_error_total").increment(1);
                warn!(
                    cache_key = %key,
                    backend = self.backend.name(),
                    error = %error,
                    "cache store failed; response still served"
                );
            }
        }
    }

    /// Delete a key. Idempotent and best-effort.
    pub async fn del(&self, key: &CacheKey) {
        if !self.enabled {
            return;
        }

        if let Err(error) = self.backend.del(&key.to_string()).await {
            counter!("prepstack_cache_backend_error_total").increment(1);
            warn!(
                cache_key = %key,
                backend = self.backend.name(),
                error = %error,
                "cache delete failed; entry expires by ttl"
            );
        }
    }
}
