use crate::constants::{SEARCH_CACHE_KEY_PREFIX, XPOS_SORT_KEY};

/// Cache key of a search's results under a given sort.
///
/// A missing or empty sort maps to [`XPOS_SORT_KEY`], so omitting the sort and passing the
/// default explicitly share one entry.
pub fn search_cache_key(search_guid: &str, sort: Option<&str>) -> String {
    let sort = sort.filter(|s| !s.is_empty()).unwrap_or(XPOS_SORT_KEY);
    format!("{}__{}__{}", SEARCH_CACHE_KEY_PREFIX, search_guid, sort)
}
