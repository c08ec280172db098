//! Read-through response cache middleware.
//!
//! Serves cached JSON bodies for recognized GET routes and captures handler
//! output on a miss. Only 200 responses with JSON bodies are stored; every
//! other case passes through untouched.

use std::time::Duration;

use axum::{
    Json,
    body::Body,
    extract::State,
    http::{Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http_body::Body as _;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::client::CacheClient;
use super::keys::CacheKey;

/// Upper bound when buffering a response body for cache population.
const RESPONSE_BUFFER_LIMIT: usize = 2 * 1024 * 1024;

const TTL_SUBJECT_LIST: Duration = Duration::from_secs(1800);
const TTL_SUBJECT_ITEM: Duration = Duration::from_secs(600);
const TTL_CHILD_LIST: Duration = Duration::from_secs(300);
const TTL_EXPERIENCE_PUBLIC: Duration = Duration::from_secs(1800);
const TTL_EXPERIENCE_QUEUE: Duration = Duration::from_secs(300);

/// Shared cache state for the middleware layer.
#[derive(Clone)]
pub struct CacheState {
    pub client: CacheClient,
}

/// Effective key and TTL for one cacheable route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachePolicy {
    pub key: CacheKey,
    pub ttl: Duration,
}

impl CachePolicy {
    fn new(key: CacheKey, ttl: Duration) -> Self {
        Self { key, ttl }
    }

    /// Route table for the cached GET surface. Unlisted paths proceed
    /// uncached.
    pub fn for_path(path: &str) -> Option<Self> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            ["subjects"] => Some(Self::new(CacheKey::SubjectsAll, TTL_SUBJECT_LIST)),
            ["subjects", id] => Uuid::parse_str(id)
                .ok()
                .map(|id| Self::new(CacheKey::Subject(id), TTL_SUBJECT_ITEM)),
            ["subtopics", subject_id] => Uuid::parse_str(subject_id)
                .ok()
                .map(|id| Self::new(CacheKey::Subtopics(id), TTL_CHILD_LIST)),
            ["questions", subtopic_id] => Uuid::parse_str(subtopic_id)
                .ok()
                .map(|id| Self::new(CacheKey::Questions(id), TTL_CHILD_LIST)),
            ["interview", "public"] => {
                Some(Self::new(CacheKey::InterviewPublic, TTL_EXPERIENCE_PUBLIC))
            }
            ["interview", "unpublished"] => Some(Self::new(
                CacheKey::InterviewUnpublished,
                TTL_EXPERIENCE_QUEUE,
            )),
            _ => None,
        }
    }

    /// Compute the policy for a request. Query parameters change the payload,
    /// so a parameterized request falls back to the default method+path key
    /// instead of aliasing the canonical entry.
    pub fn for_request(request: &Request<Body>) -> Option<Self> {
        let policy = Self::for_path(request.uri().path())?;

        match request.uri().query() {
            Some(query) if !query.is_empty() => Some(Self::new(
                CacheKey::MethodPath {
                    method: request.method().to_string(),
                    path: format!("{}?{}", request.uri().path(), query),
                },
                policy.ttl,
            )),
            _ => Some(policy),
        }
    }
}

/// Middleware for read-through response caching.
///
/// On a hit the downstream handler never runs. On a miss the 200 JSON body is
/// buffered, written to the cache under the route's key, and forwarded
/// unchanged. Cache write failures are absorbed inside `CacheClient`.
#[instrument(skip_all, fields(path = %request.uri().path()))]
pub async fn response_cache_layer(
    State(cache): State<CacheState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !cache.client.is_enabled() {
        return next.run(request).await;
    }

    // Mutations bypass the cache by construction.
    if request.method() != Method::GET {
        return next.run(request).await;
    }

    let Some(policy) = CachePolicy::for_request(&request) else {
        return next.run(request).await;
    };

    if policy.ttl.is_zero() {
        return next.run(request).await;
    }

    if let Some(value) = cache.client.get(&policy.key).await {
        debug!(cache_key = %policy.key, outcome = "hit", "serving cached response");
        return Json(value).into_response();
    }

    debug!(cache_key = %policy.key, outcome = "miss", "executing handler");
    let response = next.run(request).await;

    // Only successful responses are cacheable.
    if response.status() != StatusCode::OK {
        return response;
    }

    let (parts, body) = response.into_parts();

    // Buffering consumes the body, so bodies of unknown size or past the
    // limit are forwarded uncached rather than risked.
    let buffered_size = body.size_hint().upper();
    if buffered_size.is_none_or(|upper| upper > RESPONSE_BUFFER_LIMIT as u64) {
        debug!(
            cache_key = %policy.key,
            size_hint = buffered_size,
            "response too large to cache; passing through"
        );
        return Response::from_parts(parts, body);
    }

    let bytes = match axum::body::to_bytes(body, RESPONSE_BUFFER_LIMIT).await {
        Ok(bytes) => bytes,
        Err(error) => {
            // The body failed mid-read; it cannot be replayed.
            warn!(cache_key = %policy.key, error = %error, "response body failed while buffering");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(value) => {
            cache.client.set(&policy.key, &value, policy.ttl).await;
        }
        Err(error) => {
            debug!(
                cache_key = %policy.key,
                error = %error,
                "response body is not JSON; skipping cache"
            );
        }
    }

    Response::from_parts(parts, Body::from(bytes))
}
