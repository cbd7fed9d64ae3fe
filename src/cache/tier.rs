use std::time::Duration;

use thiserror::Error;

/// Errors raised by individual cache tiers.
///
/// The store swallows these: a failing tier degrades hit rate, it never
/// fails the caller.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache tier unavailable: {0}")]
    Unavailable(String),

    #[error("cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// One backing tier in the cache chain.
///
/// Implementations must be safe under concurrent reads/writes to the same
/// key; last-writer-wins is acceptable.
pub trait CacheTier: Send + Sync {
    /// Tier name, for logging.
    fn name(&self) -> &'static str;

    /// Fetch raw bytes for a key. Expired entries read as absent.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store raw bytes under a key. `ttl` of `None` means the entry never
    /// expires (finished-match data is immutable).
    fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<(), CacheError>;

    /// Whether a live entry exists for the key.
    fn exists(&self, key: &str) -> Result<bool, CacheError>;

    /// Remove an entry; absent keys are not an error.
    fn delete(&self, key: &str) -> Result<(), CacheError>;
}
