//! Cache storage strategy.
//!
//! Exactly one backend is selected at process start and injected by
//! constructor; there is no runtime failover between the two.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("cache backend error: {message}")]
    Backend { message: String },
    #[error("invalid cache endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

impl CacheError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

/// Uniform get/set/delete contract over either backend.
///
/// `get` on a missing or expired key yields `Ok(None)`. `set` overwrites
/// unconditionally; a zero TTL is filtered out by `CacheClient` before it
/// reaches a backend. `del` is idempotent.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, CacheError>;

    async fn set(&self, key: &str, value: &Value, ttl: Duration) -> Result<(), CacheError>;

    async fn del(&self, key: &str) -> Result<(), CacheError>;

    /// Backend label for logs and metrics.
    fn name(&self) -> &'static str;
}
