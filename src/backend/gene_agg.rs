use tracing::{debug, info, instrument};

use crate::cache::CachedSearchResult;
use crate::model::{GeneCounts, PageRequest, SortKey, Variant};

use super::error::{BackendError, BackendResult};
use super::strategy::{SearchSession, SearchStrategy, VariantIndex, accept_filter};
use super::types::{FilterSpec, IndexQuery, PreviousResults};
use super::variant_search::ALL_RESULTS_FIELD;

/// Cached state field holding the last computed gene aggregation.
pub const GENE_AGGS_FIELD: &str = "gene_aggs";

/// Gene-aggregation search. Sort has no meaning here and is ignored.
///
/// Shares the default-sort cache entry with [`super::VariantSearch`]: once every matching
/// variant has been loaded there, counts are tallied from cache.
#[derive(Debug, Clone)]
pub struct GeneAggSearch<I: VariantIndex + Clone> {
    index: I,
}

impl<I: VariantIndex + Clone> GeneAggSearch<I> {
    pub fn new(index: I) -> Self {
        Self { index }
    }
}

impl<I: VariantIndex + Clone> SearchStrategy for GeneAggSearch<I> {
    type Output = GeneCounts;
    type Session = GeneAggSession<I>;

    fn construct(
        &self,
        families: &[String],
        previous_results: CachedSearchResult,
        user: Option<&str>,
        _sort: Option<&str>,
    ) -> Self::Session {
        GeneAggSession {
            index: self.index.clone(),
            families: families.to_vec(),
            user: user.map(str::to_string),
            query: None,
            previous_results,
        }
    }

    fn process_previous_results(
        &self,
        previous_results: &CachedSearchResult,
        request: &PageRequest,
    ) -> PreviousResults<GeneCounts> {
        let Some(total) = previous_results.total_results() else {
            return PreviousResults::Query(*request);
        };

        if let Some(counts) = previous_results.state::<GeneCounts>(GENE_AGGS_FIELD) {
            debug!(genes = counts.len(), "Gene counts cached");
            return PreviousResults::Loaded(counts);
        }

        match previous_results.state::<Vec<Variant>>(ALL_RESULTS_FIELD) {
            Some(loaded) if loaded.len() as u64 == total => {
                debug!(variants = total, "Tallying gene counts from fully loaded results");
                PreviousResults::Loaded(GeneCounts::tally(&loaded, None))
            }
            _ => PreviousResults::Query(*request),
        }
    }
}

pub struct GeneAggSession<I: VariantIndex> {
    index: I,
    families: Vec<String>,
    user: Option<String>,
    query: Option<IndexQuery>,
    previous_results: CachedSearchResult,
}

impl<I: VariantIndex> std::fmt::Debug for GeneAggSession<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneAggSession")
            .field("families", &self.families)
            .field("user", &self.user)
            .field("filtered", &self.query.is_some())
            .finish_non_exhaustive()
    }
}

impl<I: VariantIndex> SearchSession for GeneAggSession<I> {
    type Output = GeneCounts;

    fn filter(&mut self, filter: FilterSpec) -> BackendResult<()> {
        accept_filter(&mut self.query, &self.families, &SortKey::Xpos, filter)
    }

    #[instrument(skip(self), fields(user = ?self.user))]
    async fn search(&mut self, _page: usize, _num_results: usize) -> BackendResult<GeneCounts> {
        let query = self
            .query
            .as_ref()
            .ok_or_else(|| BackendError::invalid_session("search called before filter"))?;

        let aggregation = self.index.gene_aggregation(query).await?;
        info!(
            genes = aggregation.counts.len(),
            total = aggregation.total,
            "Aggregated gene counts from backend"
        );

        self.previous_results.set_total_results(aggregation.total);
        self.previous_results
            .set_state(GENE_AGGS_FIELD, &aggregation.counts)?;
        Ok(aggregation.counts)
    }

    fn previous_results(&self) -> &CachedSearchResult {
        &self.previous_results
    }

    fn into_previous_results(self) -> CachedSearchResult {
        self.previous_results
    }
}
