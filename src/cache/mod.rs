//! Prepstack cache system.
//!
//! A read-through response cache for the hot public GET endpoints:
//!
//! - **CacheBackend**: storage strategy, either in-process (`MemoryBackend`)
//!   or a remote HTTPS key-value store (`RemoteBackend`). Chosen once at
//!   startup by constructor injection.
//! - **CacheClient**: the only surface the rest of the app touches. Handles
//!   JSON (de)serialization, metrics, and absorbs every backend error.
//! - **response_cache_layer**: axum middleware that serves cached JSON for
//!   recognized GET routes and captures handler output on a miss.
//! - **CacheInvalidator**: per-resource-family key deletion, invoked
//!   synchronously after successful writes.
//!
//! A cache outage degrades latency, never correctness: every failure path
//! collapses to "treat as miss" or "skip the write".

mod backend;
mod client;
mod config;
mod invalidate;
mod keys;
mod lock;
mod memory;
mod middleware;
mod remote;

pub use backend::{CacheBackend, CacheError};
pub use client::CacheClient;
pub use config::CacheConfig;
pub use invalidate::CacheInvalidator;
pub use keys::CacheKey;
pub use memory::MemoryBackend;
pub use middleware::{CachePolicy, CacheState, response_cache_layer};
pub use remote::RemoteBackend;
