//! Cache service trait and error types.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Key/value store holding serialized cache entries.
///
/// Implementations must be thread-safe and fail open: a broken backend
/// degrades to cache misses, never to request failures.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::MemoryCache`] - in-process store with per-entry expiry
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed store with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - always misses
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Reads a serialized entry.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))` on cache hit
    /// - `Ok(None)` on cache miss, expiry or backend error (fail-open behavior)
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Stores a serialized entry.
    ///
    /// # Arguments
    ///
    /// - `key` - Cache key
    /// - `value` - Serialized payload
    /// - `ttl` - Optional lifetime (implementation default if `None`)
    ///
    /// # Errors
    ///
    /// Should not propagate errors to callers. Implementations log errors and
    /// return `Ok(())`.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> CacheResult<()>;

    /// Removes an entry. Missing keys are not an error.
    async fn invalidate(&self, key: &str) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;

    /// Backend name reported by the health endpoint.
    fn backend(&self) -> &'static str;
}
