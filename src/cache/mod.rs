//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and LRU eviction.

mod engine;
mod entry;
mod lru;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use engine::Cache;
pub use entry::{CacheEntry, Ttl};
pub use stats::CacheStats;

pub(crate) use lru::{NodeId, RecencyList};
pub(crate) use store::CacheStore;

pub(crate) use engine::lock_store;
