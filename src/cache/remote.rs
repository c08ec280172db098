//! Remote cache backend.
//!
//! Talks to a managed key-value store over HTTPS using the JSON command
//! protocol exposed by Upstash-style Redis REST endpoints: each request is a
//! single command encoded as a JSON array (`["SET", key, value, "EX", ttl]`)
//! posted to the endpoint root with a bearer token.

use std::time::Duration;

use serde::Deserialize;
use serde_json::{Value, json};
use url::Url;

use async_trait::async_trait;

use super::backend::{CacheBackend, CacheError};

pub struct RemoteBackend {
    http: reqwest::Client,
    endpoint: Url,
    token: String,
}

#[derive(Debug, Deserialize)]
struct RemoteReply {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

impl RemoteBackend {
    pub fn new(endpoint: &str, token: impl Into<String>) -> Result<Self, CacheError> {
        Ok(Self {
            http: reqwest::Client::new(),
            endpoint: Url::parse(endpoint)?,
            token: token.into(),
        })
    }

    async fn command(&self, command: Value) -> Result<Value, CacheError> {
        let reply: RemoteReply = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.token)
            .json(&command)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(message) = reply.error {
            return Err(CacheError::backend(message));
        }

        Ok(reply.result.unwrap_or(Value::Null))
    }
}

/// Stored values travel as JSON text. Entries written by earlier deployments
/// may hold bare strings, so a parse failure falls back to the raw text
/// instead of erroring.
fn decode_stored(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[async_trait]
impl CacheBackend for RemoteBackend {
    async fn get(&self, key: &str) -> Result<Option<Value>, CacheError> {
        match self.command(json!(["GET", key])).await? {
            Value::Null => Ok(None),
            Value::String(raw) => Ok(Some(decode_stored(&raw))),
            other => Ok(Some(other)),
        }
    }

    async fn set(&self, key: &str, value: &Value, ttl: Duration) -> Result<(), CacheError> {
        if ttl.is_zero() {
            return Ok(());
        }

        let text = serde_json::to_string(value)?;
        self.command(json!(["SET", key, text, "EX", ttl.as_secs()]))
            .await?;
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<(), CacheError> {
        self.command(json!(["DEL", key])).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}
