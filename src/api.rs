//! HTTP client for the Europeana REST API.
//!
//! Successful JSON responses are written to the configured [`CacheStore`]
//! and served from it until they expire.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::cache::{CacheStore, NullStore};
use crate::config::{Config, DEFAULT_CACHE_EXPIRES_IN};

/// Request parameters. Ordered, so equal requests share a cache key.
pub type Params = BTreeMap<String, String>;

/// Failures talking to the API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to send request to Europeana API: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Europeana API error ({status}): {body}")]
    Status { status: StatusCode, body: String },
    #[error("Europeana API request unsuccessful: {0}")]
    Unsuccessful(String),
    #[error("failed to parse Europeana API response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("unexpected Europeana API response: {0}")]
    Malformed(String),
}

impl ApiError {
    /// Whether the API reported the requested resource as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status, .. } if *status == StatusCode::NOT_FOUND)
    }
}

/// Europeana API connection.
#[derive(Clone)]
pub struct EuropeanaApi {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    cache: Arc<dyn CacheStore>,
    cache_expires_in: Duration,
}

impl EuropeanaApi {
    /// A connection without response caching.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            cache: Arc::new(NullStore),
            cache_expires_in: DEFAULT_CACHE_EXPIRES_IN,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.europeana_api_url, &config.europeana_api_key)
            .with_cache(config.cache.build(), config.cache_expires_in)
    }

    /// Cache responses in `cache` for `expires_in`.
    pub fn with_cache(mut self, cache: Arc<dyn CacheStore>, expires_in: Duration) -> Self {
        self.cache = cache;
        self.cache_expires_in = expires_in;
        self
    }

    /// Fetch a single record by its ID (e.g. "/abc/123").
    pub async fn record(&self, id: &str, params: &Params) -> Result<Value, ApiError> {
        self.get_json(&format!("{}.json", id), params).await
    }

    /// Run a search.
    pub async fn search(&self, params: &Params) -> Result<Value, ApiError> {
        self.get_json("/search.json", params).await
    }

    async fn get_json(&self, path: &str, params: &Params) -> Result<Value, ApiError> {
        let key = cache_key(path, params);
        if let Some(cached) = self.cache.read(&key) {
            return Ok(cached);
        }

        debug!("Europeana API request: {}", key);
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("wskey", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Europeana API error ({}) for {}", status, key);
            return Err(ApiError::Status { status, body });
        }

        let body = response.text().await?;
        let json: Value = serde_json::from_str(&body)?;

        if json.get("success").and_then(Value::as_bool) == Some(false) {
            let message = json
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("no error message")
                .to_string();
            warn!("Europeana API request unsuccessful for {}: {}", key, message);
            return Err(ApiError::Unsuccessful(message));
        }

        self.cache.write(&key, &json, self.cache_expires_in);
        Ok(json)
    }
}

/// Cache key for a request: its path and parameters, without the API key.
fn cache_key(path: &str, params: &Params) -> String {
    let query = params
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join("&");
    format!("europeana/api{}?{}", path, query)
}
