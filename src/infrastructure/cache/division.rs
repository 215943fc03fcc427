//! Grouped cache invalidation.
//!
//! A [`DivisionCache`] wraps a [`CacheService`] and remembers which keys were
//! filled under which division label (for example `"general"`), so that a
//! whole group can be dropped at once after a write.
//!
//! The membership index lives in process memory only and starts empty on
//! restart. With a shared store such as Redis, entries written by a previous
//! process expire through their TTL.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use super::service::CacheService;

/// Per-entry overrides for [`DivisionCache::get_or_create_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryOptions {
    /// Entry lifetime; `None` uses the store default.
    pub ttl: Option<Duration>,
}

impl EntryOptions {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self { ttl: Some(ttl) }
    }
}

/// Keys of one division plus the generation they were recorded in.
///
/// A division gets a fresh generation whenever it is created or one of its
/// keys is dropped, so a value computed before an invalidation can tell it
/// is stale.
struct Division {
    generation: u64,
    keys: HashSet<String>,
}

/// Cache facade that tracks keys per division.
pub struct DivisionCache {
    store: Arc<dyn CacheService>,
    divisions: DashMap<String, Division>,
    next_generation: AtomicU64,
}

impl DivisionCache {
    pub fn new(store: Arc<dyn CacheService>) -> Self {
        Self {
            store,
            divisions: DashMap::new(),
            next_generation: AtomicU64::new(0),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<dyn CacheService> {
        &self.store
    }

    /// Returns the cached value for `key`, or runs `factory` and caches its
    /// result.
    ///
    /// `key` is recorded under `division` before the lookup. Recording is
    /// idempotent. Entries that fail to deserialize are treated as misses
    /// and overwritten. If the division is invalidated while `factory` runs,
    /// the computed value is returned but not cached.
    ///
    /// # Errors
    ///
    /// Only errors produced by `factory` are returned; store failures degrade
    /// to a miss.
    pub async fn get_or_create<T, E, F, Fut>(
        &self,
        division: &str,
        key: &str,
        factory: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.get_or_create_with(division, key, EntryOptions::default(), factory)
            .await
    }

    /// Like [`Self::get_or_create`] with explicit entry options.
    pub async fn get_or_create_with<T, E, F, Fut>(
        &self,
        division: &str,
        key: &str,
        options: EntryOptions,
        factory: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let generation = self.track(division, key);

        if let Some(value) = self.read::<T>(key).await {
            metrics::counter!("cache_lookups_total", "result" => "hit").increment(1);
            return Ok(value);
        }

        metrics::counter!("cache_lookups_total", "result" => "miss").increment(1);
        let value = factory().await?;

        if !self.is_current(division, generation) {
            debug!(division, key, "Division invalidated while computing, not caching");
            return Ok(value);
        }

        match serde_json::to_string(&value) {
            Ok(serialized) => {
                if let Err(e) = self.store.set(key, &serialized, options.ttl).await {
                    warn!(division, key, error = %e, "Cache SET failed");
                }
                // An invalidation may have landed while the write was in flight.
                if !self.is_current(division, generation) {
                    self.invalidate(key).await;
                }
            }
            Err(e) => warn!(division, key, error = %e, "Cache value not serializable"),
        }

        Ok(value)
    }

    /// Invalidates every key recorded under `division` and forgets the
    /// division. Unknown divisions are a no-op.
    pub async fn remove(&self, division: &str) {
        let Some((_, removed)) = self.divisions.remove(division) else {
            return;
        };

        debug!(division, keys = removed.keys.len(), "Invalidating cache division");
        for key in &removed.keys {
            self.invalidate(key).await;
        }
    }

    /// Invalidates a single key and drops it from `division`.
    pub async fn remove_key(&self, division: &str, key: &str) {
        let untracked = self
            .divisions
            .get_mut(division)
            .map(|mut entry| {
                entry.generation = self.bump_generation();
                entry.keys.remove(key)
            })
            .unwrap_or(false);

        self.divisions.remove_if(division, |_, entry| entry.keys.is_empty());

        if untracked {
            self.invalidate(key).await;
        }
    }

    /// Invalidates every tracked key in every division.
    pub async fn clear(&self) {
        let divisions: Vec<String> = self.divisions.iter().map(|e| e.key().clone()).collect();
        for division in divisions {
            self.remove(&division).await;
        }
    }

    /// Keys currently recorded under `division`, sorted.
    pub fn keys(&self, division: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .divisions
            .get(division)
            .map(|entry| entry.keys.iter().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    pub fn division_count(&self) -> usize {
        self.divisions.len()
    }

    /// Records `key` and returns the division's current generation.
    fn track(&self, division: &str, key: &str) -> u64 {
        let mut entry = self
            .divisions
            .entry(division.to_string())
            .or_insert_with(|| Division {
                generation: self.bump_generation(),
                keys: HashSet::new(),
            });
        if !entry.keys.contains(key) {
            entry.keys.insert(key.to_string());
        }
        entry.generation
    }

    fn is_current(&self, division: &str, generation: u64) -> bool {
        self.divisions
            .get(division)
            .is_some_and(|entry| entry.generation == generation)
    }

    fn bump_generation(&self) -> u64 {
        self.next_generation.fetch_add(1, Ordering::Relaxed)
    }

    async fn invalidate(&self, key: &str) {
        if let Err(e) = self.store.invalidate(key).await {
            warn!(key, error = %e, "Cache invalidation failed");
        }
    }

    async fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.store.get(key).await.ok().flatten()?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "Discarding undecodable cache entry");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::cache::{CacheError, CacheResult, MemoryCache, NullCache};
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn cache() -> DivisionCache {
        DivisionCache::new(Arc::new(MemoryCache::new(None)))
    }

    async fn counted(cache: &DivisionCache, calls: &AtomicUsize, key: &str) -> Vec<String> {
        cache
            .get_or_create("general", key, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, Infallible>(vec!["rust".to_string()])
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_key_recorded_once() {
        let cache = cache();
        let calls = AtomicUsize::new(0);

        counted(&cache, &calls, "tags").await;
        counted(&cache, &calls, "tags").await;

        assert_eq!(cache.keys("general"), vec!["tags".to_string()]);
        assert_eq!(cache.division_count(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_remove_division_reruns_factory() {
        let cache = cache();
        let calls = AtomicUsize::new(0);

        counted(&cache, &calls, "tags").await;
        cache.remove("general").await;
        assert!(cache.keys("general").is_empty());

        counted(&cache, &calls, "tags").await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_remove_unknown_division_is_noop() {
        let cache = cache();
        cache.remove("nope").await;
        assert_eq!(cache.division_count(), 0);
    }

    #[tokio::test]
    async fn test_remove_key_leaves_siblings() {
        let cache = cache();
        let calls = AtomicUsize::new(0);

        counted(&cache, &calls, "tags").await;
        counted(&cache, &calls, "categories").await;
        cache.remove_key("general", "tags").await;

        assert_eq!(cache.keys("general"), vec!["categories".to_string()]);
        counted(&cache, &calls, "categories").await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_clear_drops_all_divisions() {
        let cache = cache();
        let calls = AtomicUsize::new(0);

        counted(&cache, &calls, "tags").await;
        cache
            .get_or_create("post", "post:1", || async { Ok::<_, Infallible>(1u32) })
            .await
            .unwrap();
        assert_eq!(cache.division_count(), 2);

        cache.clear().await;
        assert_eq!(cache.division_count(), 0);
    }

    #[tokio::test]
    async fn test_factory_error_is_returned_and_not_cached() {
        let cache = cache();

        let result: Result<u32, &str> = cache
            .get_or_create("general", "k", || async { Err("db down") })
            .await;
        assert_eq!(result, Err("db down"));

        let result: Result<u32, &str> = cache
            .get_or_create("general", "k", || async { Ok(7) })
            .await;
        assert_eq!(result, Ok(7));
    }

    #[tokio::test]
    async fn test_undecodable_entry_is_a_miss() {
        let store = Arc::new(MemoryCache::new(None));
        store.set("k", "not json", None).await.unwrap();
        let cache = DivisionCache::new(store);

        let value = cache
            .get_or_create("general", "k", || async { Ok::<_, Infallible>(3u32) })
            .await
            .unwrap();
        assert_eq!(value, 3);
    }

    #[tokio::test]
    async fn test_null_store_always_runs_factory() {
        let cache = DivisionCache::new(Arc::new(NullCache::new()));
        let calls = AtomicUsize::new(0);

        counted(&cache, &calls, "tags").await;
        counted(&cache, &calls, "tags").await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_remove_during_slow_factory_discards_stale_value() {
        let cache = cache();

        let slow_read = cache.get_or_create("general", "tags", || async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok::<_, Infallible>("old".to_string())
        });
        let writer = async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            cache.remove("general").await;
        };
        let (stale, ()) = tokio::join!(slow_read, writer);
        assert_eq!(stale.unwrap(), "old");
        assert!(cache.keys("general").is_empty());

        cache.remove("general").await;
        let fresh = cache
            .get_or_create("general", "tags", || async {
                Ok::<_, Infallible>("new".to_string())
            })
            .await
            .unwrap();
        assert_eq!(fresh, "new");
    }

    #[tokio::test]
    async fn test_remove_key_during_slow_factory_discards_stale_value() {
        let cache = cache();
        let calls = AtomicUsize::new(0);
        counted(&cache, &calls, "categories").await;

        let slow_read = cache.get_or_create("general", "tags", || async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok::<_, Infallible>(1u32)
        });
        let writer = async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            cache.remove_key("general", "tags").await;
        };
        let _ = tokio::join!(slow_read, writer);

        let fresh = cache
            .get_or_create("general", "tags", || async { Ok::<_, Infallible>(2u32) })
            .await
            .unwrap();
        assert_eq!(fresh, 2);
    }

    struct FailingStore;

    #[async_trait::async_trait]
    impl CacheService for FailingStore {
        async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
            Err(CacheError::ConnectionError("down".to_string()))
        }

        async fn set(&self, _key: &str, _value: &str, _ttl: Option<Duration>) -> CacheResult<()> {
            Err(CacheError::ConnectionError("down".to_string()))
        }

        async fn invalidate(&self, _key: &str) -> CacheResult<()> {
            Err(CacheError::OperationError("down".to_string()))
        }

        async fn health_check(&self) -> bool {
            false
        }

        fn backend(&self) -> &'static str {
            "failing"
        }
    }

    #[tokio::test]
    async fn test_store_errors_degrade_to_uncached_values() {
        let cache = DivisionCache::new(Arc::new(FailingStore));
        let calls = AtomicUsize::new(0);

        assert_eq!(counted(&cache, &calls, "tags").await, vec!["rust".to_string()]);
        counted(&cache, &calls, "tags").await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        cache.remove_key("general", "tags").await;
        counted(&cache, &calls, "tags").await;
        cache.remove("general").await;
        assert_eq!(cache.division_count(), 0);
    }

    #[tokio::test]
    async fn test_explicit_ttl_expires() {
        let cache = cache();
        let calls = AtomicUsize::new(0);
        let options = EntryOptions::with_ttl(Duration::from_millis(10));

        for _ in 0..2 {
            cache
                .get_or_create_with("general", "short", options, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, Infallible>(1u8)
                })
                .await
                .unwrap();
            tokio::time::sleep(Duration::from_millis(30)).await;
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
