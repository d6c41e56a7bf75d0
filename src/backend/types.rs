use crate::locus::LocusResolution;
use crate::model::{GeneCounts, Interval, PageRequest, SearchFilter, SortKey, Variant};

use super::error::BackendErrorKind;

/// Filters applied to a backend session: the submitted criteria plus the resolved locus.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    pub filter: SearchFilter,
    pub genes: Vec<String>,
    pub intervals: Vec<Interval>,
    pub rs_ids: Option<Vec<String>>,
    pub variant_ids: Option<Vec<String>>,
    pub skip_genotype_filter: bool,
}

impl FilterSpec {
    pub fn new(filter: SearchFilter, locus: LocusResolution, skip_genotype_filter: bool) -> Self {
        Self {
            filter,
            genes: locus.genes,
            intervals: locus.intervals,
            rs_ids: locus.rs_ids,
            variant_ids: locus.variant_ids,
            skip_genotype_filter,
        }
    }

    pub fn has_location(&self) -> bool {
        !self.genes.is_empty() || !self.intervals.is_empty()
    }
}

/// A fully specified query against a [`super::VariantIndex`].
#[derive(Debug, Clone, PartialEq)]
pub struct IndexQuery {
    pub families: Vec<String>,
    pub sort: SortKey,
    pub filter: FilterSpec,
}

/// One window of sorted matches plus the total match count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexPage {
    pub variants: Vec<Variant>,
    pub total: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneAggregation {
    pub counts: GeneCounts,
    /// Number of matching variants the counts were built from.
    pub total: u64,
}

/// Outcome of inspecting cached state for a new request.
#[derive(Debug, Clone, PartialEq)]
pub enum PreviousResults<T> {
    /// Cached state already answers the request.
    Loaded(T),
    /// The backend must be queried with this (possibly widened) request.
    Query(PageRequest),
}

impl<T> PreviousResults<T> {
    pub fn is_loaded(&self) -> bool {
        matches!(self, PreviousResults::Loaded(_))
    }
}

/// Status codes, messages and log severities a backend contributes to the error policy.
#[derive(Debug, Clone, Default)]
pub struct ErrorTable {
    pub statuses: Vec<(BackendErrorKind, u16)>,
    pub messages: Vec<(BackendErrorKind, String)>,
    /// Kinds logged at error severity; all others log as warnings.
    pub error_log_kinds: Vec<BackendErrorKind>,
}
