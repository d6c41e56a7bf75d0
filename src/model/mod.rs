//! Domain types shared by the resolver, cache, backend and orchestrator.

pub mod locus;
pub mod search;
pub mod variant;


pub use locus::{Interval, LocusSpec, VariantIdentifier};
pub use search::{FrequencyFilter, PageRequest, SearchDefinition, SearchFilter, SortKey};
pub use variant::{DatasetType, GeneCount, GeneCounts, Variant};
