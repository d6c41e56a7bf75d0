//! Cross-cutting, shared constants.
//!
//! Every cache key, ceiling and default page size used by the orchestrator derives from
//! these values. Runtime overrides go through [`crate::config::Config`].

use std::time::Duration;

/// Sort key for genomic-position ordering. Also the default sort of every search.
pub const XPOS_SORT_KEY: &str = "xpos";

/// Sort key ordering variants by their first carrying family.
pub const FAMILY_GUID_SORT_KEY: &str = "family_guid";

/// Maximum total result count a load-all request may pull.
pub const MAX_VARIANTS: u64 = 3000;

/// Lifetime of a cached search result entry.
pub const SEARCH_CACHE_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 7 * 2);

pub const DEFAULT_PAGE_SIZE: usize = 100;

pub const SEARCH_CACHE_KEY_PREFIX: &str = "search_results";

/// Bounds of a valid position within a chromosome (inclusive).
pub const MIN_POSITION: u64 = 1;
pub const MAX_POSITION: u64 = 300_000_000;

/// Multiplier separating chromosomes in an xpos ordinal.
pub const XPOS_CHROM_FACTOR: u64 = 1_000_000_000;

/// Chromosomes in xpos order. `MT` is accepted as an alias of `M`.
pub const CHROMOSOMES: [&str; 25] = [
    "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12", "13", "14", "15", "16", "17",
    "18", "19", "20", "21", "22", "X", "Y", "M",
];

/// Crate version reported by the status check.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
