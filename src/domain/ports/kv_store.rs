use async_trait::async_trait;
use std::time::Duration;

use crate::domain::errors::CacheError;

/// Port for a key-value backend with per-entry expiration.
///
/// Implementations report their own failures; callers that need fail-soft
/// semantics go through [`crate::services::CacheStore`] instead of using
/// this trait directly.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Read a value, `Ok(None)` when absent or expired
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Write a value that expires after `ttl`
    async fn put(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;

    /// Remove a value; removing a missing key is not an error
    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}
