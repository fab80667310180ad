pub mod moka_cache;

pub use moka_cache::MokaCacheStore;

use async_trait::async_trait;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// String key/value cache used for serialized snapshots.
///
/// Implementations must treat `set_string` expirations as sliding: every
/// successful read extends the entry's lifetime by the same duration.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get_string(&self, key: &str) -> CacheResult<Option<String>>;

    async fn set_string(
        &self,
        key: &str,
        value: String,
        sliding_expiration: Duration,
    ) -> CacheResult<()>;

    async fn remove(&self, key: &str) -> CacheResult<()>;
}
