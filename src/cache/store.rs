use std::time::{Duration, Instant};

use moka::Expiry;
use moka::sync::Cache;
use serde_json::Value;

use super::error::StoreResult;

/// Key-value store holding cached search state as JSON with per-entry expiry.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value under `key`, or `None` if absent or expired.
    fn get_json(&self, key: &str)
    -> impl std::future::Future<Output = StoreResult<Option<Value>>> + Send;

    /// Replaces the value under `key`; it expires `ttl` after this write.
    fn set_json(
        &self,
        key: &str,
        value: Value,
        ttl: Duration,
    ) -> impl std::future::Future<Output = StoreResult<()>> + Send;

    /// Checks that the store is reachable.
    fn ping(&self) -> impl std::future::Future<Output = StoreResult<()>> + Send;
}

#[derive(Debug, Clone)]
struct StoredValue {
    value: Value,
    ttl: Duration,
}

struct PerEntryTtl;

impl Expiry<String, StoredValue> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &StoredValue,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &StoredValue,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-process store backed by a bounded moka cache.
pub struct MemoryStore {
    entries: Cache<String, StoredValue>,
}

impl MemoryStore {
    const DEFAULT_CAPACITY: u64 = 10_000;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Creates a store holding at most `capacity` entries (LRU eviction beyond that).
    pub fn with_capacity(capacity: u64) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(capacity)
                .expire_after(PerEntryTtl)
                .build(),
        }
    }

    pub fn len(&self) -> u64 {
        self.entries.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.entry_count() == 0
    }

    pub fn run_pending_tasks(&self) {
        self.entries.run_pending_tasks();
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

impl KeyValueStore for MemoryStore {
    async fn get_json(&self, key: &str) -> StoreResult<Option<Value>> {
        Ok(self.entries.get(&key.to_string()).map(|stored| stored.value))
    }

    async fn set_json(&self, key: &str, value: Value, ttl: Duration) -> StoreResult<()> {
        self.entries
            .insert(key.to_string(), StoredValue { value, ttl });
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

impl<S: KeyValueStore> KeyValueStore for std::sync::Arc<S> {
    async fn get_json(&self, key: &str) -> StoreResult<Option<Value>> {
        (**self).get_json(key).await
    }

    async fn set_json(&self, key: &str, value: Value, ttl: Duration) -> StoreResult<()> {
        (**self).set_json(key, value, ttl).await
    }

    async fn ping(&self) -> StoreResult<()> {
        (**self).ping().await
    }
}
