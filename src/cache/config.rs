//! Cache configuration.

use std::num::NonZeroUsize;
use std::time::Duration;

use serde::Deserialize;

const DEFAULT_TTL_SECONDS: u64 = 3600;
const DEFAULT_MEMORY_ENTRY_LIMIT: usize = 512;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Disabling turns every lookup into a miss and every write into a no-op.
    pub enabled: bool,
    /// TTL applied when a route policy does not name one.
    pub default_ttl_seconds: u64,
    /// Capacity of the in-process LRU backend.
    pub memory_entry_limit: usize,
    /// Remote store endpoint; the remote backend is selected only when both
    /// the URL and the token are present at startup.
    pub remote_url: Option<String>,
    pub remote_token: Option<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_ttl_seconds: DEFAULT_TTL_SECONDS,
            memory_entry_limit: DEFAULT_MEMORY_ENTRY_LIMIT,
            remote_url: None,
            remote_token: None,
        }
    }
}

impl CacheConfig {
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_seconds)
    }

    /// Returns the memory entry limit as NonZeroUsize, clamping to 1 if zero.
    pub fn memory_entry_limit_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.memory_entry_limit).unwrap_or(NonZeroUsize::MIN)
    }

    /// Remote connection parameters, when fully configured.
    pub fn remote(&self) -> Option<(&str, &str)> {
        match (self.remote_url.as_deref(), self.remote_token.as_deref()) {
            (Some(url), Some(token)) if !url.is_empty() && !token.is_empty() => {
                Some((url, token))
            }
            _ => None,
        }
    }
}
