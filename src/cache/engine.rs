//! Cache Engine Module
//!
//! The thread-safe public cache: one exclusive lock around the store, plus
//! ownership of the background sweeper.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::debug;

use crate::cache::{CacheStats, CacheStore, Ttl};
use crate::config::CacheConfig;
use crate::error::Result;
use crate::tasks::{Sweeper, SweeperState};

/// Store shared between the cache and its sweeper.
pub(crate) type SharedStore<V> = Arc<Mutex<CacheStore<V>>>;

/// Acquires the store lock for a whole operation.
///
/// Store methods never panic halfway through a mutation, so a poisoned lock
/// still guards a consistent structure and is recovered.
pub(crate) fn lock_store<V>(store: &Mutex<CacheStore<V>>) -> MutexGuard<'_, CacheStore<V>> {
    store.lock().unwrap_or_else(PoisonError::into_inner)
}

// == Cache ==
/// Bounded, thread-safe key/value cache with LRU eviction and TTL expiration.
///
/// Share it between threads with `Arc<Cache<V>>`. Reads return clones of the
/// stored value.
///
/// # Example
/// ```no_run
/// use lru_ttl_cache::Cache;
///
/// let cache: Cache<String> = Cache::new()?;
/// cache.set("greeting", "hello".to_string());
/// cache.set_with_expiration("session", "abc".to_string(), 60);
///
/// assert_eq!(cache.get("greeting"), Some("hello".to_string()));
/// cache.stop_cleanup();
/// # Ok::<(), lru_ttl_cache::CacheError>(())
/// ```
#[derive(Debug)]
pub struct Cache<V> {
    store: SharedStore<V>,
    sweeper: Sweeper,
}

impl<V: Clone + Send + 'static> Cache<V> {
    // == Constructors ==
    /// Creates a cache with the default configuration and starts its sweeper.
    pub fn new() -> Result<Self> {
        Self::with_config(CacheConfig::default())
    }

    /// Creates a cache from `config`, failing fast if it is invalid.
    ///
    /// The sweeper gets its own thread, independent of any runtime the caller
    /// is running in.
    pub fn with_config(config: CacheConfig) -> Result<Self> {
        config.validate()?;

        let store = Arc::new(Mutex::new(CacheStore::new(
            config.capacity,
            config.default_ttl_duration(),
        )));
        let sweeper = Sweeper::spawn(Arc::downgrade(&store), config.sweep_interval_duration())?;

        Ok(Self { store, sweeper })
    }

    // == Get ==
    /// Returns a clone of the value stored under `key`, if present and live.
    pub fn get(&self, key: &str) -> Option<V> {
        self.lock().get(key).cloned()
    }

    // == Set ==
    /// Stores `value` under `key` with no expiration.
    pub fn set(&self, key: impl Into<String>, value: V) {
        self.set_with_ttl(key, value, Ttl::Never);
    }

    /// Stores `value` under `key`.
    ///
    /// `ttl_seconds` negative = never expires, zero = default TTL, positive =
    /// expires that many seconds from now.
    pub fn set_with_expiration(&self, key: impl Into<String>, value: V, ttl_seconds: i64) {
        self.set_with_ttl(key, value, Ttl::from(ttl_seconds));
    }

    pub fn set_with_ttl(&self, key: impl Into<String>, value: V, ttl: Ttl) {
        self.lock().set(key.into(), value, ttl);
    }

    // == Set If Absent ==
    /// Stores `value` with no expiration unless `key` already holds a live
    /// entry. Returns whether the value was inserted.
    pub fn set_if_absent(&self, key: impl Into<String>, value: V) -> bool {
        self.set_if_absent_with_ttl(key, value, Ttl::Never)
    }

    /// Like [`Cache::set_if_absent`], with `ttl_seconds` interpreted as in
    /// [`Cache::set_with_expiration`].
    pub fn set_if_absent_with_expiration(
        &self,
        key: impl Into<String>,
        value: V,
        ttl_seconds: i64,
    ) -> bool {
        self.set_if_absent_with_ttl(key, value, Ttl::from(ttl_seconds))
    }

    pub fn set_if_absent_with_ttl(&self, key: impl Into<String>, value: V, ttl: Ttl) -> bool {
        self.lock().set_if_absent(key.into(), value, ttl)
    }

    // == Delete ==
    /// Removes `key`. Missing keys are ignored.
    pub fn delete(&self, key: &str) {
        self.lock().delete(key);
    }

    // == Count ==
    /// Number of indexed entries, including expired ones not yet reclaimed.
    pub fn count(&self) -> i64 {
        i64::try_from(self.lock().len()).unwrap_or(i64::MAX)
    }

    // == Flush ==
    /// Removes every entry. The sweeper keeps its schedule.
    pub fn flush(&self) {
        self.lock().flush();
        debug!("Cache flushed");
    }

    // == Cleanup ==
    /// Runs one sweep immediately and returns the number of entries removed.
    pub fn cleanup(&self) -> usize {
        self.lock().cleanup_expired()
    }

    /// Remaining lifetime of `key` without refreshing its recency.
    ///
    /// `None` if absent or expired, `Some(None)` if it never expires.
    pub fn ttl_remaining(&self, key: &str) -> Option<Option<Duration>> {
        self.lock().ttl_remaining(key)
    }

    pub fn stats(&self) -> CacheStats {
        self.lock().stats()
    }

    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    // == Stop Cleanup ==
    /// Permanently stops the background sweeper. Repeat calls do nothing.
    pub fn stop_cleanup(&self) {
        self.sweeper.stop();
    }

    pub fn sweeper_state(&self) -> SweeperState {
        self.sweeper.state()
    }

    fn lock(&self) -> MutexGuard<'_, CacheStore<V>> {
        lock_store(&self.store)
    }
}
