//! Search result caching: key derivation, store capability and the swallowing gateway.

pub mod error;
pub mod gateway;
pub mod key;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod store;
pub mod types;


pub use error::{StoreError, StoreResult};
pub use gateway::ResultCache;
pub use key::search_cache_key;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockStore;
pub use store::{KeyValueStore, MemoryStore};
pub use types::CachedSearchResult;
