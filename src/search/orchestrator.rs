use std::time::Duration;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::backend::{
    BackendError, FilterSpec, GeneAggSearch, PreviousResults, SearchSession, SearchStrategy,
    VariantIndex, VariantSearch,
};
use crate::cache::{CachedSearchResult, KeyValueStore, ResultCache, search_cache_key};
use crate::constants::{DEFAULT_PAGE_SIZE, MAX_VARIANTS, SEARCH_CACHE_TTL};
use crate::locus::{GeneCatalog, resolve_locus};
use crate::model::{DatasetType, GeneCounts, PageRequest, SearchDefinition, Variant};
use crate::status::{StatusReport, check_status};

use super::error::{SearchError, SearchResult};
use super::policy::ErrorPolicy;

pub const TOO_MANY_VARIANTS_MESSAGE: &str =
    "Too many variants to load. Please refine your search and try again";

/// Tunables handed to the orchestrator at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSettings {
    /// Load-all requests fail once a search is known to match this many variants.
    pub max_variants: u64,
    pub cache_ttl: Duration,
    pub default_page_size: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_variants: MAX_VARIANTS,
            cache_ttl: SEARCH_CACHE_TTL,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of a variant search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResults {
    pub variants: Vec<Variant>,
    #[serde(rename = "totalResults")]
    pub total_results: Option<u64>,
}

/// Top-level search entry points.
///
/// Each call reads the cached state for its `(search, sort)` key, answers from it when
/// possible, and otherwise resolves the locus, queries the backend and overwrites the cache
/// entry. Nothing is held between calls except through the store.
pub struct SearchOrchestrator<S: KeyValueStore, I: VariantIndex + Clone> {
    cache: ResultCache<S>,
    variant_search: VariantSearch<I>,
    gene_agg_search: GeneAggSearch<I>,
    index: I,
    catalog: GeneCatalog,
    policy: ErrorPolicy,
    settings: SearchSettings,
}

impl<S: KeyValueStore, I: VariantIndex + Clone> std::fmt::Debug for SearchOrchestrator<S, I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchOrchestrator")
            .field("settings", &self.settings)
            .field("genes", &self.catalog.len())
            .finish_non_exhaustive()
    }
}

impl<S: KeyValueStore, I: VariantIndex + Clone> SearchOrchestrator<S, I> {
    /// Builds an orchestrator whose error policy starts from the index's error table.
    pub fn new(store: S, index: I, settings: SearchSettings) -> Self {
        let policy = ErrorPolicy::new().with_backend(index.error_table());
        Self {
            cache: ResultCache::with_ttl(store, settings.cache_ttl),
            variant_search: VariantSearch::with_max_variants(index.clone(), settings.max_variants),
            gene_agg_search: GeneAggSearch::new(index.clone()),
            index,
            catalog: GeneCatalog::new(),
            policy,
            settings,
        }
    }

    pub fn with_gene_catalog(mut self, catalog: GeneCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn error_policy(&self) -> &ErrorPolicy {
        &self.policy
    }

    pub fn cache(&self) -> &ResultCache<S> {
        &self.cache
    }

    pub fn index(&self) -> &I {
        &self.index
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// A request for `page` at the configured default page size.
    pub fn page_request(&self, page: usize) -> PageRequest {
        PageRequest::page(page, self.settings.default_page_size)
    }

    /// Returns one page of `search` ordered by `sort` (falling back to the search's own sort,
    /// then genomic position), plus the total match count when known.
    #[instrument(
        skip(self, search, request),
        fields(
            search = %search.guid,
            page = request.page,
            num_results = request.num_results,
            load_all = request.load_all
        )
    )]
    pub async fn query_variants(
        &self,
        search: &SearchDefinition,
        sort: Option<&str>,
        request: PageRequest,
        user: Option<&str>,
    ) -> SearchResult<QueryResults> {
        validate_request(&request)?;

        let sort = sort.or(search.sort.as_deref());
        let previous = self.cache.get(&search_cache_key(&search.guid, sort)).await;
        let total_results = previous.total_results();

        let request = match self
            .variant_search
            .process_previous_results(&previous, &request)
        {
            PreviousResults::Loaded(variants) => {
                debug!(returned = variants.len(), "Served page from cached results");
                return Ok(QueryResults {
                    variants,
                    total_results,
                });
            }
            PreviousResults::Query(effective) => effective,
        };

        if request.load_all
            && total_results.is_some_and(|total| total >= self.settings.max_variants)
        {
            return Err(SearchError::invalid(TOO_MANY_VARIANTS_MESSAGE));
        }

        let (variants, total_results) = self
            .run_query(&self.variant_search, search, previous, sort, request, user)
            .await?;
        Ok(QueryResults {
            variants,
            total_results,
        })
    }

    /// Per-gene variant counts for `search`. Shares the default-sort cache entry with
    /// [`Self::query_variants`].
    #[instrument(skip(self, search), fields(search = %search.guid))]
    pub async fn gene_counts(
        &self,
        search: &SearchDefinition,
        user: Option<&str>,
    ) -> SearchResult<GeneCounts> {
        let previous = self.cache.get(&search_cache_key(&search.guid, None)).await;
        let request = self.page_request(1);

        let request = match self
            .gene_agg_search
            .process_previous_results(&previous, &request)
        {
            PreviousResults::Loaded(counts) => {
                debug!(genes = counts.len(), "Served gene counts from cached results");
                return Ok(counts);
            }
            PreviousResults::Query(effective) => effective,
        };

        let (counts, _) = self
            .run_query(&self.gene_agg_search, search, previous, None, request, user)
            .await?;
        Ok(counts)
    }

    /// Fetches one variant by id among `families`. With `return_all_queried_families`, the
    /// variant lists every queried family, not only those carrying it.
    #[instrument(skip(self, families), fields(families = families.len()))]
    pub async fn lookup_single_variant(
        &self,
        families: &[String],
        variant_id: &str,
        return_all_queried_families: bool,
        user: Option<&str>,
    ) -> SearchResult<Variant> {
        let mut variants = self
            .index
            .get_variants(
                families,
                &[variant_id.to_string()],
                None,
                return_all_queried_families,
            )
            .await
            .map_err(|e| self.backend_failure(e))?;

        if variants.is_empty() {
            return Err(SearchError::invalid(format!("Variant {} not found", variant_id)));
        }
        Ok(variants.swap_remove(0))
    }

    /// Fetches variants by id among `families`, optionally limited to one dataset type.
    #[instrument(skip(self, families, variant_ids), fields(families = families.len(), ids = variant_ids.len()))]
    pub async fn lookup_variants(
        &self,
        families: &[String],
        variant_ids: &[String],
        dataset_type: Option<DatasetType>,
        user: Option<&str>,
    ) -> SearchResult<Vec<Variant>> {
        self.index
            .get_variants(families, variant_ids, dataset_type, false)
            .await
            .map_err(|e| self.backend_failure(e))
    }

    pub async fn status(&self) -> StatusReport {
        check_status(self.cache.store(), &self.index).await
    }

    async fn run_query<St: SearchStrategy>(
        &self,
        strategy: &St,
        search: &SearchDefinition,
        previous: CachedSearchResult,
        sort: Option<&str>,
        request: PageRequest,
        user: Option<&str>,
    ) -> SearchResult<(St::Output, Option<u64>)> {
        let locus = resolve_locus(search.locus(), &self.catalog, |token| {
            strategy.parse_variant_identifier(token)
        })?;
        let num_results = locus.variant_id_count().unwrap_or(request.num_results);

        let mut session = strategy.construct(&search.families, previous, user, sort);
        let outcome = match session.filter(FilterSpec::new(
            search.filter.clone(),
            locus,
            request.skip_genotype_filter,
        )) {
            Ok(()) => session.search(request.page, num_results).await,
            Err(e) => Err(e),
        };
        let results = outcome.map_err(|e| self.backend_failure(e))?;

        let updated = session.into_previous_results();
        let total_results = updated.total_results();
        self.cache
            .set(&search_cache_key(&search.guid, sort), &updated)
            .await;

        Ok((results, total_results))
    }

    fn backend_failure(&self, e: BackendError) -> SearchError {
        let err = SearchError::from(e);
        self.policy.log(&err);
        err
    }
}

fn validate_request(request: &PageRequest) -> SearchResult<()> {
    if request.page == 0 {
        return Err(SearchError::invalid("Page must be at least 1"));
    }
    if request.num_results == 0 {
        return Err(SearchError::invalid("Number of results must be at least 1"));
    }
    Ok(())
}
