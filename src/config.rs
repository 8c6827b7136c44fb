//! Configuration Module
//!
//! Construction-time cache parameters, loadable from environment variables.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

// == Defaults ==
/// Maximum number of entries held by a default cache
pub const DEFAULT_CAPACITY: usize = 1024;

/// Default TTL in seconds (30 days)
pub const DEFAULT_TTL_SECS: u64 = 2_592_000;

/// Default interval between sweeps in seconds
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 300;

/// Cache configuration parameters.
///
/// Fixed once the cache is built; nothing here is adjustable at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// TTL in seconds applied when an entry asks for the default
    pub default_ttl: u64,
    /// Interval in seconds between background sweeps
    pub sweep_interval: u64,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 1024)
    /// - `CACHE_DEFAULT_TTL` - Default TTL in seconds (default: 2592000)
    /// - `CACHE_SWEEP_INTERVAL` - Sweep frequency in seconds (default: 300)
    pub fn from_env() -> Self {
        Self {
            capacity: env_or("CACHE_CAPACITY", DEFAULT_CAPACITY),
            default_ttl: env_or("CACHE_DEFAULT_TTL", DEFAULT_TTL_SECS),
            sweep_interval: env_or("CACHE_SWEEP_INTERVAL", DEFAULT_SWEEP_INTERVAL_SECS),
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_default_ttl(mut self, secs: u64) -> Self {
        self.default_ttl = secs;
        self
    }

    pub fn with_sweep_interval(mut self, secs: u64) -> Self {
        self.sweep_interval = secs;
        self
    }

    /// Rejects values the cache cannot operate with.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(CacheError::InvalidConfig(
                "capacity must be greater than zero".to_string(),
            ));
        }
        if self.default_ttl == 0 {
            return Err(CacheError::InvalidConfig(
                "default_ttl must be greater than zero".to_string(),
            ));
        }
        if self.sweep_interval == 0 {
            return Err(CacheError::InvalidConfig(
                "sweep_interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn default_ttl_duration(&self) -> Duration {
        Duration::from_secs(self.default_ttl)
    }

    pub fn sweep_interval_duration(&self) -> Duration {
        Duration::from_secs(self.sweep_interval)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            default_ttl: DEFAULT_TTL_SECS,
            sweep_interval: DEFAULT_SWEEP_INTERVAL_SECS,
        }
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
