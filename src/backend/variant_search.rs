use tracing::{debug, info, instrument};

use crate::cache::CachedSearchResult;
use crate::constants::MAX_VARIANTS;
use crate::model::{PageRequest, SortKey, Variant};

use super::error::{BackendError, BackendResult};
use super::strategy::{SearchSession, SearchStrategy, VariantIndex, accept_filter};
use super::types::{FilterSpec, IndexQuery, PreviousResults};

/// Cached state field holding the contiguous prefix of sorted results fetched so far.
pub const ALL_RESULTS_FIELD: &str = "all_results";

/// Row-level variant search.
///
/// Results are fetched as a growing prefix of the sorted match list. Any page inside the
/// loaded prefix is served from cache; a page past it extends the prefix. The prefix never
/// grows beyond `max_variants`: pages ending past it are fetched as a single window and
/// not kept.
#[derive(Debug, Clone)]
pub struct VariantSearch<I: VariantIndex + Clone> {
    index: I,
    max_variants: u64,
}

impl<I: VariantIndex + Clone> VariantSearch<I> {
    pub fn new(index: I) -> Self {
        Self::with_max_variants(index, MAX_VARIANTS)
    }

    pub fn with_max_variants(index: I, max_variants: u64) -> Self {
        Self {
            index,
            max_variants,
        }
    }

    pub fn index(&self) -> &I {
        &self.index
    }
}

impl<I: VariantIndex + Clone> SearchStrategy for VariantSearch<I> {
    type Output = Vec<Variant>;
    type Session = VariantSearchSession<I>;

    fn construct(
        &self,
        families: &[String],
        previous_results: CachedSearchResult,
        user: Option<&str>,
        sort: Option<&str>,
    ) -> Self::Session {
        VariantSearchSession {
            index: self.index.clone(),
            families: families.to_vec(),
            sort: SortKey::parse(sort),
            user: user.map(str::to_string),
            max_variants: self.max_variants as usize,
            query: None,
            previous_results,
        }
    }

    fn process_previous_results(
        &self,
        previous_results: &CachedSearchResult,
        request: &PageRequest,
    ) -> PreviousResults<Vec<Variant>> {
        let total = previous_results.total_results();
        let num_results = if request.load_all {
            total.unwrap_or(self.max_variants) as usize
        } else {
            request.num_results
        };
        let effective = PageRequest {
            page: if request.load_all { 1 } else { request.page },
            num_results,
            ..*request
        };

        if let Some(total) = total {
            let loaded: Vec<Variant> = previous_results
                .state(ALL_RESULTS_FIELD)
                .unwrap_or_default();
            let (start, end) = effective.range(Some(total));
            if loaded.len() >= end {
                debug!(
                    loaded = loaded.len(),
                    start = start,
                    end = end,
                    "Requested range already loaded"
                );
                return PreviousResults::Loaded(loaded[start..end].to_vec());
            }
        }

        PreviousResults::Query(effective)
    }
}

pub struct VariantSearchSession<I: VariantIndex> {
    index: I,
    families: Vec<String>,
    sort: SortKey,
    user: Option<String>,
    max_variants: usize,
    query: Option<IndexQuery>,
    previous_results: CachedSearchResult,
}

impl<I: VariantIndex> std::fmt::Debug for VariantSearchSession<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VariantSearchSession")
            .field("families", &self.families)
            .field("sort", &self.sort)
            .field("user", &self.user)
            .field("filtered", &self.query.is_some())
            .finish_non_exhaustive()
    }
}

impl<I: VariantIndex> SearchSession for VariantSearchSession<I> {
    type Output = Vec<Variant>;

    fn filter(&mut self, filter: FilterSpec) -> BackendResult<()> {
        accept_filter(&mut self.query, &self.families, &self.sort, filter)
    }

    #[instrument(skip(self), fields(sort = %self.sort, user = ?self.user))]
    async fn search(&mut self, page: usize, num_results: usize) -> BackendResult<Vec<Variant>> {
        let query = self
            .query
            .as_ref()
            .ok_or_else(|| BackendError::invalid_session("search called before filter"))?;

        let request = PageRequest::page(page, num_results);
        let mut loaded: Vec<Variant> = self
            .previous_results
            .state(ALL_RESULTS_FIELD)
            .unwrap_or_default();

        let (start, end) = request.range(self.previous_results.total_results());
        if end > self.max_variants && loaded.len() < end {
            let fetched = self.index.search(query, start, end - start).await?;
            info!(
                from = start,
                fetched = fetched.variants.len(),
                total = fetched.total,
                "Fetched page past the loadable prefix"
            );
            self.previous_results.set_total_results(fetched.total);
            return Ok(fetched.variants);
        }

        if loaded.len() < end {
            let from = loaded.len();
            let fetched = self.index.search(query, from, end - from).await?;
            info!(
                from = from,
                fetched = fetched.variants.len(),
                total = fetched.total,
                "Fetched variants from backend"
            );
            loaded.extend(fetched.variants);
            self.previous_results.set_total_results(fetched.total);
            self.previous_results
                .set_state(ALL_RESULTS_FIELD, &loaded)?;
        }

        let (start, end) = request.range(self.previous_results.total_results());
        let end = end.min(loaded.len());
        Ok(loaded[start.min(end)..end].to_vec())
    }

    fn previous_results(&self) -> &CachedSearchResult {
        &self.previous_results
    }

    fn into_previous_results(self) -> CachedSearchResult {
        self.previous_results
    }
}
