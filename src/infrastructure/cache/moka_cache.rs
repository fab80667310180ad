use super::{CacheResult, CacheStore};
use async_trait::async_trait;
use moka::future::Cache;
use moka::Expiry;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    sliding_expiration: Duration,
}

/// Resets an entry's time-to-live on creation, read and update.
struct SlidingExpiry;

impl Expiry<String, CacheEntry> for SlidingExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &CacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.sliding_expiration)
    }

    fn expire_after_read(
        &self,
        _key: &String,
        entry: &CacheEntry,
        _read_at: Instant,
        _duration_until_expiry: Option<Duration>,
        _last_modified_at: Instant,
    ) -> Option<Duration> {
        Some(entry.sliding_expiration)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &CacheEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.sliding_expiration)
    }
}

/// In-process cache backend built on moka.
pub struct MokaCacheStore {
    cache: Cache<String, CacheEntry>,
}

impl MokaCacheStore {
    pub fn new(max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(SlidingExpiry)
            .build();

        Self { cache }
    }
}

#[async_trait]
impl CacheStore for MokaCacheStore {
    async fn get_string(&self, key: &str) -> CacheResult<Option<String>> {
        Ok(self.cache.get(key).await.map(|entry| entry.value))
    }

    async fn set_string(
        &self,
        key: &str,
        value: String,
        sliding_expiration: Duration,
    ) -> CacheResult<()> {
        self.cache
            .insert(
                key.to_string(),
                CacheEntry {
                    value,
                    sliding_expiration,
                },
            )
            .await;
        Ok(())
    }

    async fn remove(&self, key: &str) -> CacheResult<()> {
        self.cache.invalidate(key).await;
        Ok(())
    }
}
