//! Cache Store Module
//!
//! The unlocked cache structure: a key index over an arena recency list, with
//! TTL expiration and strict LRU eviction. Callers serialize access; see
//! [`Cache`](crate::cache::Cache) for the locked wrapper.

use std::collections::HashMap;
use std::time::Duration;

use tracing::debug;

use crate::cache::entry::current_timestamp_ms;
use crate::cache::lru::{NodeId, RecencyList};
use crate::cache::{CacheEntry, CacheStats, Ttl};

// == Cache Store ==
/// Index + recency list. A key is in `index` iff its entry is linked in `list`.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key to arena slot
    index: HashMap<String, NodeId>,
    /// Entries ordered from most to least recently used
    list: RecencyList<CacheEntry<V>>,
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
    /// Lifetime applied for `Ttl::Default`
    default_ttl: Duration,
}

impl<V> CacheStore<V> {
    // == Constructor ==
    /// Creates an empty store. `capacity` must be non-zero; the config layer
    /// validates that before a store is built.
    pub fn new(capacity: usize, default_ttl: Duration) -> Self {
        Self {
            index: HashMap::with_capacity(capacity),
            list: RecencyList::new(),
            stats: CacheStats::new(),
            capacity,
            default_ttl,
        }
    }

    // == Get ==
    /// Returns the live value for `key` and marks it most recently used.
    ///
    /// An expired entry is removed on encounter and reported as absent.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let Some(id) = self.live_node(key, current_timestamp_ms()) else {
            self.stats.record_miss();
            return None;
        };
        self.stats.record_hit();
        self.list.move_to_front(id);
        self.list.get(id).map(|entry| &entry.value)
    }

    // == Set ==
    /// Inserts or overwrites `key`.
    ///
    /// An existing key gets its value and expiration replaced in place. A new
    /// key arriving at capacity evicts the least recently used entry first.
    pub fn set(&mut self, key: String, value: V, ttl: Ttl) {
        let now = current_timestamp_ms();
        let expires_at = ttl.expires_at(now, self.default_ttl);

        if let Some(&id) = self.index.get(&key) {
            if let Some(entry) = self.list.get_mut(id) {
                entry.value = value;
                entry.expires_at = expires_at;
            }
            self.list.move_to_front(id);
            return;
        }

        self.insert(key, value, expires_at);
    }

    // == Set If Absent ==
    /// Inserts `key` only if no live entry holds it.
    ///
    /// An expired entry that has not been swept yet counts as absent and is
    /// replaced. Returns whether the insert happened.
    pub fn set_if_absent(&mut self, key: String, value: V, ttl: Ttl) -> bool {
        let now = current_timestamp_ms();
        if self.live_node(&key, now).is_some() {
            return false;
        }
        let expires_at = ttl.expires_at(now, self.default_ttl);
        self.insert(key, value, expires_at);
        true
    }

    // == Delete ==
    /// Removes `key` if present. Returns whether an entry was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        self.remove(key).is_some()
    }

    // == Time To Live ==
    /// Remaining lifetime of a live entry; `Some(None)` if it never expires.
    ///
    /// Does not change recency.
    pub fn ttl_remaining(&self, key: &str) -> Option<Option<Duration>> {
        let now = current_timestamp_ms();
        self.index
            .get(key)
            .and_then(|&id| self.list.get(id))
            .filter(|entry| !entry.is_expired_at(now))
            .map(CacheEntry::ttl_remaining)
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = current_timestamp_ms();
        let expired: Vec<NodeId> = self
            .list
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(id, _)| id)
            .collect();

        let count = expired.len();
        for id in expired {
            if let Some(entry) = self.list.remove(id) {
                self.index.remove(&entry.key);
            }
        }

        self.stats.record_expirations(count);
        count
    }

    // == Flush ==
    /// Drops every entry and resets the chain to fresh sentinels.
    pub fn flush(&mut self) {
        self.index = HashMap::with_capacity(self.capacity);
        self.list.clear();
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.index.len());
        stats
    }

    // == Length ==
    /// Returns the number of indexed entries, including unswept expired ones.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Keys from most to least recently used.
    #[allow(dead_code)]
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.list.iter().map(|(_, entry)| entry.key.as_str())
    }

    /// Looks up `key`, lazily removing it if it has expired at `now`.
    fn live_node(&mut self, key: &str, now: i64) -> Option<NodeId> {
        let &id = self.index.get(key)?;
        let expired = self
            .list
            .get(id)
            .map_or(true, |entry| entry.is_expired_at(now));
        if expired {
            self.remove(key);
            self.stats.record_expirations(1);
            return None;
        }
        Some(id)
    }

    /// Inserts a key known to be absent from the index.
    fn insert(&mut self, key: String, value: V, expires_at: Option<i64>) {
        if self.index.len() >= self.capacity {
            if let Some(oldest) = self.list.back() {
                if let Some(evicted) = self.list.remove(oldest) {
                    self.index.remove(&evicted.key);
                    self.stats.record_eviction();
                    debug!(key = %evicted.key, "Evicted least recently used entry");
                }
            }
        }

        let id = self
            .list
            .push_front(CacheEntry::new(key.clone(), value, expires_at));
        self.index.insert(key, id);
    }

    fn remove(&mut self, key: &str) -> Option<CacheEntry<V>> {
        let id = self.index.remove(key)?;
        self.list.remove(id)
    }
}
