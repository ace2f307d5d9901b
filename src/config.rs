use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::cache::{CacheStore, MemoryStore, NullStore};

pub const DEFAULT_API_URL: &str = "https://api.europeana.eu/record/v2";

/// Default lifetime of cached API responses: 24 hours.
pub const DEFAULT_CACHE_EXPIRES_IN: Duration = Duration::from_secs(24 * 60 * 60);

/// Which store caches API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKind {
    Null,
    Memory,
}

impl CacheKind {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "" | "null" | "none" => Ok(CacheKind::Null),
            "memory" => Ok(CacheKind::Memory),
            other => bail!("Unknown EUROPEANA_API_CACHE store: '{}'", other),
        }
    }

    pub fn build(self) -> Arc<dyn CacheStore> {
        match self {
            CacheKind::Null => Arc::new(NullStore),
            CacheKind::Memory => Arc::new(MemoryStore::new()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    // Europeana API
    pub europeana_api_key: String,
    pub europeana_api_url: String,

    // Response cache
    pub cache: CacheKind,
    pub cache_expires_in: Duration,

    // Localization
    pub default_locale: String,

    // Server
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Europeana API
            europeana_api_key: std::env::var("EUROPEANA_API_KEY")
                .context("EUROPEANA_API_KEY not set")?,
            europeana_api_url: std::env::var("EUROPEANA_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),

            // Response cache
            cache: CacheKind::parse(&std::env::var("EUROPEANA_API_CACHE").unwrap_or_default())?,
            cache_expires_in: std::env::var("EUROPEANA_API_CACHE_EXPIRES_IN")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_CACHE_EXPIRES_IN),

            // Localization
            default_locale: std::env::var("DEFAULT_LOCALE").unwrap_or_else(|_| "en".to_string()),

            // Server
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
        })
    }
}
