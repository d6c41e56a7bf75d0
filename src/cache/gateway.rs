use std::time::Duration;

use tracing::{debug, instrument, warn};

use super::store::KeyValueStore;
use super::types::CachedSearchResult;
use crate::constants::SEARCH_CACHE_TTL;

/// Gateway between the orchestrator and the key-value store.
///
/// Store failures are logged and swallowed: a failed read is an empty result, a failed
/// write is dropped. Values are always replaced whole, never merged.
pub struct ResultCache<S: KeyValueStore> {
    store: S,
    ttl: Duration,
}

impl<S: KeyValueStore> std::fmt::Debug for ResultCache<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultCache")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl<S: KeyValueStore> ResultCache<S> {
    pub fn new(store: S) -> Self {
        Self::with_ttl(store, SEARCH_CACHE_TTL)
    }

    pub fn with_ttl(store: S, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    #[instrument(skip(self))]
    pub async fn get(&self, key: &str) -> CachedSearchResult {
        match self.store.get_json(key).await {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(cached) => cached,
                Err(e) => {
                    warn!(error = %e, "Discarding undecodable cached search result");
                    CachedSearchResult::default()
                }
            },
            Ok(None) => {
                debug!("No cached search result");
                CachedSearchResult::default()
            }
            Err(e) => {
                warn!(error = %e, "Cache store read failed, treating as miss");
                CachedSearchResult::default()
            }
        }
    }

    #[instrument(skip(self, value), fields(total_results = value.total_results()))]
    pub async fn set(&self, key: &str, value: &CachedSearchResult) {
        let json = match serde_json::to_value(value) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "Could not encode search result for caching");
                return;
            }
        };

        if let Err(e) = self.store.set_json(key, json, self.ttl).await {
            warn!(error = %e, "Cache store write failed, result not cached");
        }
    }
}
