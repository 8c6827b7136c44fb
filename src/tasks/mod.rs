//! Background Tasks Module
//!
//! Contains background tasks that run periodically for the lifetime of a cache.
//!
//! # Tasks
//! - TTL Sweeper: Removes expired cache entries at configured intervals

mod cleanup;

pub use cleanup::SweeperState;

pub(crate) use cleanup::Sweeper;
