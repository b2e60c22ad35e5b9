//! Fail-soft adapter over a [`KvStore`] backend.
//!
//! Every operation here is advisory: backend errors are logged and collapsed
//! into a miss (reads) or a no-op (writes, deletes), and a store built
//! without a backend behaves as permanently empty. Callers never see a
//! [`CacheError`], so the pipeline stays correct with the cache disabled.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::domain::errors::CacheError;
use crate::domain::models::{Repository, RepositoryAnalysis};
use crate::domain::ports::KvStore;

/// Cache key for the analysis of one repository version:
/// `repo:<full_name>:<updated_at>`.
pub fn analysis_cache_key(full_name: &str, updated_at: &str) -> String {
    format!("repo:{full_name}:{updated_at}")
}

/// Key of the marker recording when `list_key` was last refreshed from upstream.
pub fn refresh_marker_key(list_key: &str) -> String {
    format!("{list_key}-last-refresh")
}

/// Fail-soft cache over an optional key-value backend.
#[derive(Clone)]
pub struct CacheStore {
    backend: Option<Arc<dyn KvStore>>,
}

impl CacheStore {
    pub fn new(backend: Arc<dyn KvStore>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// A store with no backend: every read misses, every write is dropped.
    pub const fn disabled() -> Self {
        Self { backend: None }
    }

    pub const fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    /// Read a raw value; `None` on miss, error, or missing backend.
    pub async fn get(&self, key: &str) -> Option<String> {
        let Some(backend) = &self.backend else {
            debug!(key, "cache backend not available, skipping lookup");
            return None;
        };

        match backend.get(key).await {
            Ok(Some(value)) => {
                debug!(key, "cache hit");
                Some(value)
            }
            Ok(None) => {
                debug!(key, "cache miss");
                None
            }
            Err(err) => {
                error!(key, error = %err, "error retrieving from cache");
                None
            }
        }
    }

    /// Write a raw value with a TTL. Never fails.
    pub async fn put(&self, key: &str, value: String, ttl: Duration) {
        log_write(key, self.write(key, value, ttl).await);
    }

    /// Remove a value. Never fails.
    pub async fn delete(&self, key: &str) {
        let Some(backend) = &self.backend else {
            debug!(key, "cache backend not available, skipping delete");
            return;
        };

        match backend.delete(key).await {
            Ok(()) => debug!(key, "cache entry deleted"),
            Err(err) => error!(key, error = %err, "error deleting from cache"),
        }
    }

    /// Drop a cached entry so the next lookup recomputes it.
    pub async fn invalidate(&self, key: &str) {
        self.delete(key).await;
    }

    /// Look up a stored analysis.
    pub async fn get_analysis(&self, key: &str) -> Option<RepositoryAnalysis> {
        self.get_json(key).await
    }

    /// Store an analysis under its content-addressed key.
    pub async fn store_analysis(&self, key: &str, analysis: &RepositoryAnalysis, ttl: Duration) {
        let result = self.write_json(key, analysis, ttl).await;
        log_write(key, result);
    }

    /// Look up the cached popular-repository list.
    pub async fn get_popular_repos(&self, list_key: &str) -> Option<Vec<Repository>> {
        self.get_json(list_key).await
    }

    /// Raw last-refresh marker for `list_key`, if any.
    pub async fn last_refresh(&self, list_key: &str) -> Option<String> {
        self.get(&refresh_marker_key(list_key)).await
    }

    /// Store the popular list and then its refresh marker.
    ///
    /// The marker is written only after the list itself was stored, so a
    /// failed list write is never recorded as a completed refresh.
    pub async fn store_popular_repos(
        &self,
        list_key: &str,
        repositories: &[Repository],
        ttl: Duration,
        refreshed_at: DateTime<Utc>,
    ) {
        match self.write_json(list_key, repositories, ttl).await {
            Ok(true) => {
                debug!(
                    key = list_key,
                    count = repositories.len(),
                    ttl_secs = ttl.as_secs(),
                    "cached popular repositories"
                );
            }
            Ok(false) => {
                debug!(key = list_key, "cache backend not available, skipping popular repos storage");
                return;
            }
            Err(err) => {
                error!(key = list_key, error = %err, "error storing popular repos in cache");
                return;
            }
        }

        let marker = refreshed_at.to_rfc3339_opts(SecondsFormat::Millis, true);
        self.put(&refresh_marker_key(list_key), marker, ttl).await;
    }

    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get(key).await?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key, error = %err, "discarding undecodable cache entry");
                None
            }
        }
    }

    async fn write_json<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<bool, CacheError> {
        let encoded = serde_json::to_string(value)?;
        self.write(key, encoded, ttl).await
    }

    /// `Ok(false)` when there is no backend to write to.
    async fn write(&self, key: &str, value: String, ttl: Duration) -> Result<bool, CacheError> {
        let Some(backend) = &self.backend else {
            return Ok(false);
        };
        backend.put(key, value, ttl).await?;
        Ok(true)
    }
}

fn log_write(key: &str, result: Result<bool, CacheError>) {
    match result {
        Ok(true) => debug!(key, "cached value"),
        Ok(false) => debug!(key, "cache backend not available, skipping storage"),
        Err(err) => error!(key, error = %err, "error storing in cache"),
    }
}
