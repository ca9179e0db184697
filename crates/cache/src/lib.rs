//! Shared status cache.
//!
//! The cache is a capability injected into every service (the [`Cache`]
//! trait), constructed once at startup and held behind an `Arc` -- never an
//! ambient global. It is treated as always-available-but-possibly-wrong:
//! callers on an authoritative path must degrade a cache failure to a miss
//! instead of aborting.

mod memory;
mod redis;

pub use memory::MemoryCache;
pub use redis::RedisCache;

use std::time::Duration;

use async_trait::async_trait;

/// Errors from a cache backend.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache connection failed: {0}")]
    Connection(String),

    #[error("cache command failed: {0}")]
    Command(String),
}

/// Key-value cache contract shared by all services.
///
/// Entries written with [`Cache::set`] persist until overwritten or deleted;
/// [`Cache::set_with_ttl`] entries expire on their own.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Fetch a value. `Ok(None)` is a miss.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store a value with no expiry.
    async fn set(&self, key: &str, value: &str) -> Result<(), CacheError>;

    /// Store a value that expires after `ttl`.
    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration)
        -> Result<(), CacheError>;

    /// Remove a key. Returns whether it existed.
    async fn delete(&self, key: &str) -> Result<bool, CacheError>;
}
