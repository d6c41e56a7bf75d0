//! Mock key-value store with failure injection and call accounting.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::Value;

use super::error::{StoreError, StoreResult};
use super::store::KeyValueStore;

/// In-memory store for tests. Expiry is recorded, not enforced.
#[derive(Debug, Default)]
pub struct MockStore {
    entries: Mutex<HashMap<String, (Value, Duration)>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every operation fails, as if the server were down.
    pub fn unavailable() -> Self {
        let store = Self::default();
        store.set_fail_reads(true);
        store.set_fail_writes(true);
        store
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Seeds a value directly, bypassing failure injection and counters.
    pub fn insert_raw(&self, key: &str, value: Value) {
        self.entries
            .lock()
            .insert(key.to_string(), (value, Duration::ZERO));
    }

    pub fn get_raw(&self, key: &str) -> Option<Value> {
        self.entries.lock().get(key).map(|(value, _)| value.clone())
    }

    pub fn ttl_of(&self, key: &str) -> Option<Duration> {
        self.entries.lock().get(key).map(|(_, ttl)| *ttl)
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.lock().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn unavailable_error() -> StoreError {
        StoreError::Unavailable {
            reason: "mock store offline".to_string(),
        }
    }
}

impl KeyValueStore for MockStore {
    async fn get_json(&self, key: &str) -> StoreResult<Option<Value>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Self::unavailable_error());
        }
        Ok(self.get_raw(key))
    }

    async fn set_json(&self, key: &str, value: Value, ttl: Duration) -> StoreResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::unavailable_error());
        }
        self.entries.lock().insert(key.to_string(), (value, ttl));
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Self::unavailable_error());
        }
        Ok(())
    }
}
