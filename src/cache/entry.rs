//! Cache Entry Module
//!
//! Defines individual cache entries and the TTL model that resolves their
//! absolute expiration.

use std::time::Duration;

// == TTL ==
/// Requested lifetime of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ttl {
    /// The entry never expires
    Never,
    /// Use the cache's configured default TTL
    Default,
    /// Expire this long after the write. A zero duration means `Default`,
    /// matching zero seconds in the integer form.
    After(Duration),
}

impl From<i64> for Ttl {
    /// Negative seconds mean never, zero means default, positive is explicit.
    fn from(secs: i64) -> Self {
        match secs {
            s if s < 0 => Ttl::Never,
            0 => Ttl::Default,
            s => Ttl::After(Duration::from_secs(s as u64)),
        }
    }
}

impl Ttl {
    // == Expiration ==
    /// Resolves this TTL into an absolute Unix-millisecond deadline.
    ///
    /// Returns `None` for entries that never expire.
    pub fn expires_at(self, now_ms: i64, default_ttl: Duration) -> Option<i64> {
        let lifetime = match self {
            Ttl::Never => return None,
            Ttl::Default => default_ttl,
            Ttl::After(duration) if duration.is_zero() => default_ttl,
            Ttl::After(duration) => duration,
        };
        // Rounded up so a sub-millisecond lifetime is not dead on arrival
        let lifetime_ms =
            i64::try_from(lifetime.as_nanos().div_ceil(1_000_000)).unwrap_or(i64::MAX);
        Some(now_ms.saturating_add(lifetime_ms))
    }
}

// == Cache Entry ==
/// A single cache entry. Links into the recency list live in the arena node
/// that owns this entry, not here.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// Key under which the entry is indexed
    pub key: String,
    /// The stored value
    pub value: V,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<i64>,
}

impl<V> CacheEntry<V> {
    pub fn new(key: String, value: V, expires_at: Option<i64>) -> Self {
        Self {
            key,
            value,
            expires_at,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now_ms`.
    ///
    /// An entry is expired once the current time reaches its deadline.
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        match self.expires_at {
            Some(expires) => now_ms >= expires,
            None => false,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_ms())
    }

    // == Time To Live ==
    /// Returns the remaining lifetime, or None if no expiration is set.
    ///
    /// An expired entry reports `Some(Duration::ZERO)`.
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.expires_at.map(|expires| {
            let remaining = expires.saturating_sub(current_timestamp_ms()).max(0);
            Duration::from_millis(remaining as u64)
        })
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
