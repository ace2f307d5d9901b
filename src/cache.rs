//! Response cache for metadata API calls.
//!
//! The API client stores decoded JSON responses keyed by request URL. Which
//! store backs it is configuration: `NullStore` disables caching,
//! `MemoryStore` keeps entries in process until they expire.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// A store for cached API responses.
pub trait CacheStore: Send + Sync {
    /// Read a live entry.
    fn read(&self, key: &str) -> Option<Value>;

    /// Store `value` under `key` for `expires_in`.
    fn write(&self, key: &str, value: &Value, expires_in: Duration);

    /// Remove every entry.
    fn clear(&self);
}

/// A store that never holds anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullStore;

impl CacheStore for NullStore {
    fn read(&self, _key: &str) -> Option<Value> {
        None
    }

    fn write(&self, _key: &str, _value: &Value, _expires_in: Duration) {}

    fn clear(&self) {}
}

#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    expires_at: DateTime<Utc>,
}

/// In-process store with per-entry expiry.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

/// Snapshot of cache usage.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: usize,
    pub misses: usize,
    pub hit_rate: f64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        CacheStats {
            entries: self.lock().len(),
            hits,
            misses,
            hit_rate,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        // Entries are replaced whole, so a poisoned map is still consistent
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CacheStore for MemoryStore {
    fn read(&self, key: &str) -> Option<Value> {
        let mut entries = self.lock();
        let now = Utc::now();

        let state = entries
            .get(key)
            .map(|entry| (entry.expires_at > now).then(|| entry.value.clone()));

        match state {
            Some(Some(value)) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!("Cache hit: {}", key);
                Some(value)
            }
            Some(None) => {
                entries.remove(key);
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!("Cache entry expired: {}", key);
                None
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!("Cache miss: {}", key);
                None
            }
        }
    }

    fn write(&self, key: &str, value: &Value, expires_in: Duration) {
        let Ok(ttl) = chrono::Duration::from_std(expires_in) else {
            return;
        };
        let Some(expires_at) = Utc::now().checked_add_signed(ttl) else {
            return;
        };

        self.lock().insert(
            key.to_string(),
            Entry {
                value: value.clone(),
                expires_at,
            },
        );
    }

    fn clear(&self) {
        self.lock().clear();
    }
}
