use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use serde::Deserialize;

use varcache::model::{DatasetType, PageRequest, SearchDefinition, SearchFilter};

#[derive(Parser, Debug)]
#[command(name = "varcache", version, about = "Paginated, cached genomic variant search")]
pub struct Cli {
    /// Variant index JSON (overrides VARCACHE_INDEX_PATH)
    #[arg(long, global = true)]
    pub index: Option<PathBuf>,

    /// Acting user, recorded in logs
    #[arg(long, global = true)]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch one page of a variant search
    Query(QueryArgs),

    /// Count matching variants per gene
    GeneCounts {
        /// Search definition JSON
        search: PathBuf,
    },

    /// Fetch variants by id
    Lookup(LookupArgs),

    /// Report backend and cache store health
    Status,
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Search definition JSON
    pub search: PathBuf,

    /// 1-based page number
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Page size (defaults to VARCACHE_PAGE_SIZE)
    #[arg(long)]
    pub num_results: Option<usize>,

    /// Sort key: xpos, family_guid or a numeric variant field
    #[arg(long)]
    pub sort: Option<String>,

    /// Load every matching variant up to the ceiling
    #[arg(long)]
    pub load_all: bool,

    /// Match variants regardless of family genotypes
    #[arg(long)]
    pub skip_genotype_filter: bool,
}

impl QueryArgs {
    pub fn page_request(&self, default_page_size: usize) -> PageRequest {
        PageRequest {
            page: self.page,
            num_results: self.num_results.unwrap_or(default_page_size),
            load_all: self.load_all,
            skip_genotype_filter: self.skip_genotype_filter,
        }
    }
}

#[derive(Args, Debug)]
pub struct LookupArgs {
    /// Variant ids (chrom-pos-ref-alt)
    #[arg(required = true)]
    pub variant_ids: Vec<String>,

    /// Family to search in (repeatable)
    #[arg(long = "family", required = true)]
    pub families: Vec<String>,

    /// Restrict to one dataset type: SNV_INDEL, SV or MITO
    #[arg(long, conflicts_with = "all_queried_families")]
    pub dataset_type: Option<DatasetType>,

    /// For a single id, list every queried family on the variant
    #[arg(long)]
    pub all_queried_families: bool,
}

/// A search definition as submitted on disk. Without a `guid`, one is derived from the
/// content.
#[derive(Debug, Deserialize)]
struct SearchFile {
    #[serde(default)]
    guid: Option<String>,
    families: Vec<String>,
    #[serde(default, alias = "search")]
    filter: SearchFilter,
    #[serde(default)]
    sort: Option<String>,
}

pub fn load_search(path: &Path) -> anyhow::Result<SearchDefinition> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let file: SearchFile = serde_json::from_slice(&bytes)
        .with_context(|| format!("invalid search definition in {}", path.display()))?;

    let mut search = match file.guid {
        Some(guid) => SearchDefinition::with_guid(guid, file.families, file.filter),
        None => SearchDefinition::new(file.families, file.filter),
    };
    search.sort = file.sort;
    Ok(search)
}
