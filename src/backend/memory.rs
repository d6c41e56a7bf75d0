//! In-memory reference search engine.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::locus::{GeneCatalog, get_xpos, normalize_chrom};
use crate::model::{DatasetType, GeneCounts, SortKey, Variant};

use super::error::{BackendError, BackendErrorKind, BackendResult};
use super::strategy::VariantIndex;
use super::types::{ErrorTable, FilterSpec, GeneAggregation, IndexPage, IndexQuery};

/// On-disk form of a [`MemoryVariantIndex`]: the variants plus an optional symbol → gene id
/// table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexFile {
    pub variants: Vec<Variant>,
    #[serde(default)]
    pub genes: BTreeMap<String, String>,
}

impl IndexFile {
    pub fn load(path: &Path) -> BackendResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            BackendError::unavailable(format!("failed to read index {}: {}", path.display(), e))
        })?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub fn into_parts(self) -> (MemoryVariantIndex, GeneCatalog) {
        let catalog = GeneCatalog::with_symbols(self.genes);
        (MemoryVariantIndex::new(self.variants), catalog)
    }
}

/// Evaluates searches over a variant list held in memory.
///
/// Family scoping follows genotype calls: a variant matches when one of the searched
/// families carries it, unless the genotype filter is skipped. Returned variants only list
/// the searched families.
#[derive(Debug, Default)]
pub struct MemoryVariantIndex {
    variants: RwLock<Vec<Variant>>,
}

impl MemoryVariantIndex {
    pub fn new(variants: Vec<Variant>) -> Self {
        Self {
            variants: RwLock::new(variants.into_iter().map(normalize_variant).collect()),
        }
    }

    pub fn insert(&self, variant: Variant) {
        self.variants.write().push(normalize_variant(variant));
    }

    pub fn len(&self) -> usize {
        self.variants.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.read().is_empty()
    }

    fn matching(&self, query: &IndexQuery) -> Vec<Variant> {
        let families: BTreeSet<String> = query.families.iter().cloned().collect();
        let terms = query.filter.filter.annotation_terms();

        self.variants
            .read()
            .iter()
            .filter(|v| matches_filter(v, &query.filter, &families, &terms))
            .map(|v| scope_to_families(v, &families))
            .collect()
    }
}

fn normalize_variant(mut variant: Variant) -> Variant {
    variant.chrom = normalize_chrom(&variant.chrom);
    if variant.xpos == 0 {
        variant.xpos = get_xpos(&variant.chrom, variant.pos).unwrap_or_default();
    }
    variant
}

fn scope_to_families(variant: &Variant, families: &BTreeSet<String>) -> Variant {
    let mut scoped = variant.clone();
    scoped.family_guids.retain(|f| families.contains(f));
    scoped
}

fn with_all_families(variant: &Variant, families: &BTreeSet<String>) -> Variant {
    let mut annotated = variant.clone();
    annotated.family_guids = families.iter().cloned().collect();
    annotated
}

fn matches_filter(
    variant: &Variant,
    spec: &FilterSpec,
    families: &BTreeSet<String>,
    terms: &[&str],
) -> bool {
    if !spec.skip_genotype_filter && !variant.family_guids.iter().any(|f| families.contains(f)) {
        return false;
    }

    if let Some(ids) = &spec.variant_ids {
        if !ids.contains(&variant.variant_id) {
            return false;
        }
    }

    if let Some(rs_ids) = &spec.rs_ids {
        if !variant.rsid.as_ref().is_some_and(|rsid| rs_ids.contains(rsid)) {
            return false;
        }
    }

    if spec.has_location() {
        let in_gene = variant.gene_ids.iter().any(|g| spec.genes.contains(g));
        let in_interval = spec
            .intervals
            .iter()
            .any(|interval| interval.contains(&variant.chrom, variant.pos));
        if !in_gene && !in_interval {
            return false;
        }
    }

    if !terms.is_empty()
        && !variant
            .consequence_terms
            .iter()
            .any(|term| terms.contains(&term.as_str()))
    {
        return false;
    }

    if let Some(frequencies) = &spec.filter.frequencies {
        for (population, limit) in frequencies {
            if let (Some(max_af), Some(af)) = (limit.af, variant.population_afs.get(population)) {
                if *af > max_af {
                    return false;
                }
            }
        }
    }

    true
}

fn compare_variants(a: &Variant, b: &Variant, sort: &SortKey) -> Ordering {
    let primary = match sort {
        SortKey::Xpos => Ordering::Equal,
        SortKey::FamilyGuid => a.family_guids.iter().min().cmp(&b.family_guids.iter().min()),
        SortKey::Field(name) => match (a.numeric_field(name), b.numeric_field(name)) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    };
    primary
        .then(a.xpos.cmp(&b.xpos))
        .then_with(|| a.variant_id.cmp(&b.variant_id))
}

impl VariantIndex for MemoryVariantIndex {
    async fn ping(&self) -> BackendResult<()> {
        Ok(())
    }

    async fn search(&self, query: &IndexQuery, from: usize, size: usize) -> BackendResult<IndexPage> {
        let mut matches = self.matching(query);
        matches.sort_by(|a, b| compare_variants(a, b, &query.sort));

        let total = matches.len() as u64;
        let variants: Vec<Variant> = matches.into_iter().skip(from).take(size).collect();
        debug!(from = from, size = size, total = total, "Memory index search");

        Ok(IndexPage { variants, total })
    }

    async fn gene_aggregation(&self, query: &IndexQuery) -> BackendResult<GeneAggregation> {
        let matches = self.matching(query);
        Ok(GeneAggregation {
            counts: GeneCounts::tally(&matches, None),
            total: matches.len() as u64,
        })
    }

    async fn get_variants(
        &self,
        families: &[String],
        variant_ids: &[String],
        dataset_type: Option<DatasetType>,
        return_all_queried_families: bool,
    ) -> BackendResult<Vec<Variant>> {
        let families: BTreeSet<String> = families.iter().cloned().collect();
        let mut found: Vec<Variant> = self
            .variants
            .read()
            .iter()
            .filter(|v| variant_ids.contains(&v.variant_id))
            .filter(|v| dataset_type.is_none_or(|dt| v.dataset_type == dt))
            .filter(|v| v.family_guids.iter().any(|f| families.contains(f)))
            .map(|v| {
                if return_all_queried_families {
                    with_all_families(v, &families)
                } else {
                    scope_to_families(v, &families)
                }
            })
            .collect();
        found.sort_by(|a, b| compare_variants(a, b, &SortKey::Xpos));
        Ok(found)
    }

    fn error_table(&self) -> ErrorTable {
        ErrorTable {
            statuses: vec![
                (BackendErrorKind::Unavailable, 503),
                (BackendErrorKind::Timeout, 504),
                (BackendErrorKind::QueryRejected, 400),
            ],
            messages: vec![(
                BackendErrorKind::QueryRejected,
                "Search is too broad or malformed. Please refine your search and try again"
                    .to_string(),
            )],
            error_log_kinds: vec![BackendErrorKind::Unavailable, BackendErrorKind::Internal],
        }
    }
}
