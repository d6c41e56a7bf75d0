//! Search backend capability and the two search strategies built on it.
//!
//! [`VariantSearch`] pages through sorted variants; [`GeneAggSearch`] counts variants per
//! gene. Both read and extend the same [`crate::cache::CachedSearchResult`] so either can
//! reuse what the other loaded.

pub mod error;
pub mod gene_agg;
pub mod memory;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod strategy;
pub mod types;
pub mod variant_search;

#[cfg(test)]
mod tests;

pub use error::{BackendError, BackendErrorKind, BackendResult};
pub use gene_agg::{GENE_AGGS_FIELD, GeneAggSearch, GeneAggSession};
pub use memory::{IndexFile, MemoryVariantIndex};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockVariantIndex;
pub use strategy::{SearchSession, SearchStrategy, VariantIndex};
pub use types::{ErrorTable, FilterSpec, GeneAggregation, IndexPage, IndexQuery, PreviousResults};
pub use variant_search::{ALL_RESULTS_FIELD, VariantSearch, VariantSearchSession};
