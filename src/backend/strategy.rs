use crate::cache::CachedSearchResult;
use crate::locus::{IdentifierError, parse_variant_id};
use crate::model::{DatasetType, PageRequest, Variant, VariantIdentifier};

use super::error::{BackendError, BackendResult};
use super::types::{ErrorTable, FilterSpec, GeneAggregation, IndexPage, IndexQuery, PreviousResults};

/// A search strategy: how to open sessions and how to read its own cached state.
pub trait SearchStrategy: Send + Sync {
    type Output: Send;
    type Session: SearchSession<Output = Self::Output>;

    /// Opens a session over `families`, seeded with the cached state for this search.
    fn construct(
        &self,
        families: &[String],
        previous_results: CachedSearchResult,
        user: Option<&str>,
        sort: Option<&str>,
    ) -> Self::Session;

    /// Decides from cached state alone whether `request` can be answered without a query.
    fn process_previous_results(
        &self,
        previous_results: &CachedSearchResult,
        request: &PageRequest,
    ) -> PreviousResults<Self::Output>;

    fn parse_variant_identifier(&self, token: &str) -> Result<VariantIdentifier, IdentifierError> {
        parse_variant_id(token)
    }
}

/// A backend session scoped to one family set.
///
/// `filter` must be called exactly once, before `search`. `search` refreshes the session's
/// cached state (resumption data and `total_results`), which the caller persists afterwards.
pub trait SearchSession: Send {
    type Output: Send;

    fn filter(&mut self, filter: FilterSpec) -> BackendResult<()>;

    fn search(
        &mut self,
        page: usize,
        num_results: usize,
    ) -> impl std::future::Future<Output = BackendResult<Self::Output>> + Send;

    fn previous_results(&self) -> &CachedSearchResult;

    fn into_previous_results(self) -> CachedSearchResult;
}

/// The search engine behind the strategies.
pub trait VariantIndex: Send + Sync {
    fn ping(&self) -> impl std::future::Future<Output = BackendResult<()>> + Send;

    /// Returns matches `[from, from + size)` in `query.sort` order, plus the total count.
    fn search(
        &self,
        query: &IndexQuery,
        from: usize,
        size: usize,
    ) -> impl std::future::Future<Output = BackendResult<IndexPage>> + Send;

    fn gene_aggregation(
        &self,
        query: &IndexQuery,
    ) -> impl std::future::Future<Output = BackendResult<GeneAggregation>> + Send;

    /// Fetches variants by id among `families`, optionally limited to one dataset type.
    ///
    /// Returned variants list only the queried families that carry them, or every queried
    /// family when `return_all_queried_families` is set.
    fn get_variants(
        &self,
        families: &[String],
        variant_ids: &[String],
        dataset_type: Option<DatasetType>,
        return_all_queried_families: bool,
    ) -> impl std::future::Future<Output = BackendResult<Vec<Variant>>> + Send;

    fn error_table(&self) -> ErrorTable {
        ErrorTable::default()
    }
}

impl<I: VariantIndex> VariantIndex for std::sync::Arc<I> {
    async fn ping(&self) -> BackendResult<()> {
        (**self).ping().await
    }

    async fn search(&self, query: &IndexQuery, from: usize, size: usize) -> BackendResult<IndexPage> {
        (**self).search(query, from, size).await
    }

    async fn gene_aggregation(&self, query: &IndexQuery) -> BackendResult<GeneAggregation> {
        (**self).gene_aggregation(query).await
    }

    async fn get_variants(
        &self,
        families: &[String],
        variant_ids: &[String],
        dataset_type: Option<DatasetType>,
        return_all_queried_families: bool,
    ) -> BackendResult<Vec<Variant>> {
        (**self)
            .get_variants(families, variant_ids, dataset_type, return_all_queried_families)
            .await
    }

    fn error_table(&self) -> ErrorTable {
        (**self).error_table()
    }
}

/// Shared `filter` bookkeeping: a session accepts exactly one filter.
pub(crate) fn accept_filter(
    slot: &mut Option<IndexQuery>,
    families: &[String],
    sort: &crate::model::SortKey,
    filter: FilterSpec,
) -> BackendResult<()> {
    if slot.is_some() {
        return Err(BackendError::invalid_session("filter already applied to session"));
    }
    *slot = Some(IndexQuery {
        families: families.to_vec(),
        sort: sort.clone(),
        filter,
    });
    Ok(())
}
