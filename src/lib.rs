//! LRU TTL Cache - An embeddable in-process key/value cache
//!
//! Bounded capacity with least-recently-used eviction, per-entry TTL
//! expiration, and a background sweeper, safe to share across threads.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{Cache, CacheStats, Ttl};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use tasks::SweeperState;
