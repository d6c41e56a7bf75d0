//! Varcache library crate (used by the CLI and integration tests).
//!
//! Serves genomic variant searches page by page from a pluggable search backend, keeping
//! per-search resumption state in a key-value store so page turns rarely reach the backend.
//!
//! # Public API Surface
//!
//! ## Entry Points
//! - [`SearchOrchestrator`] - variant pages, gene counts, id lookups, status
//! - [`SearchSettings`], [`Config`] - ceiling, cache TTL and page size
//! - [`ErrorPolicy`], [`ErrorResponse`] - error to status/message mapping
//!
//! ## Components
//! - [`locus`] - gene, interval, variant id and rsID resolution
//! - [`cache`] - cache keys, [`KeyValueStore`], [`ResultCache`] gateway
//! - [`backend`] - [`SearchStrategy`] / [`VariantIndex`] capabilities and the
//!   [`MemoryVariantIndex`] reference engine
//! - [`status`] - dependent/secondary service probes
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod backend;
pub mod cache;
pub mod config;
pub mod constants;
pub mod hashing;
pub mod locus;
pub mod model;
pub mod search;
pub mod status;

pub use backend::{
    BackendError, BackendErrorKind, ErrorTable, GeneAggSearch, IndexFile, MemoryVariantIndex,
    SearchSession, SearchStrategy, VariantIndex, VariantSearch,
};
#[cfg(any(test, feature = "mock"))]
pub use backend::MockVariantIndex;
pub use cache::{CachedSearchResult, KeyValueStore, MemoryStore, ResultCache, search_cache_key};
#[cfg(any(test, feature = "mock"))]
pub use cache::MockStore;
pub use config::{Config, ConfigError};
pub use constants::{DEFAULT_PAGE_SIZE, MAX_VARIANTS, SEARCH_CACHE_TTL, XPOS_SORT_KEY};
pub use hashing::hash_search_identity;
pub use locus::{GeneCatalog, IdentifierError, LocusError, resolve_locus};
pub use model::{
    DatasetType, GeneCounts, LocusSpec, PageRequest, SearchDefinition, SearchFilter, SortKey,
    Variant,
};
pub use search::{
    ErrorPolicy, ErrorResponse, QueryResults, SearchError, SearchOrchestrator, SearchResult,
    SearchSettings,
};
pub use status::{StatusReport, check_status};
