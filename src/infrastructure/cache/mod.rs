//! Caching layer.
//!
//! Provides a [`CacheService`] trait with three stores:
//! - [`MemoryCache`] - In-process store (default)
//! - [`RedisCache`] - Redis-backed store, enabled by `REDIS_URL`
//! - [`NullCache`] - No-op implementation for disabled caching
//!
//! [`DivisionCache`] sits on top of any store and adds grouped invalidation.

mod division;
mod memory_cache;
mod null_cache;
mod redis_cache;
mod service;

pub use division::{DivisionCache, EntryOptions};
pub use memory_cache::MemoryCache;
pub use null_cache::NullCache;
pub use redis_cache::RedisCache;
pub use service::{CacheError, CacheResult, CacheService};
