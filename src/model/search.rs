use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::locus::LocusSpec;
use crate::constants::{DEFAULT_PAGE_SIZE, FAMILY_GUID_SORT_KEY, XPOS_SORT_KEY};
use crate::hashing::hash_search_identity;

/// Filter criteria of a variant search.
///
/// Only `frequencies`, `annotations`, `annotations_secondary` and `locus` are typed; the
/// remaining criteria are handed to the backend untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inheritance: Option<Value>,

    /// Maximum allele frequency per population.
    #[serde(
        rename = "freqs",
        alias = "frequencies",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub frequencies: Option<BTreeMap<String, FrequencyFilter>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pathogenicity: Option<Value>,

    /// Consequence terms grouped by annotation category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, Vec<String>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations_secondary: Option<BTreeMap<String, Vec<String>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_silico: Option<Value>,

    #[serde(
        rename = "qualityFilter",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub quality_filter: Option<Value>,

    #[serde(
        rename = "customQuery",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub custom_query: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locus: Option<LocusSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrequencyFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub af: Option<f64>,
}

impl SearchFilter {
    /// All consequence terms from primary and secondary annotations.
    pub fn annotation_terms(&self) -> Vec<&str> {
        self.annotations
            .iter()
            .chain(self.annotations_secondary.iter())
            .flat_map(|groups| groups.values())
            .flatten()
            .map(String::as_str)
            .collect()
    }
}

/// A submitted search: its identity, the family set it targets and its filters.
///
/// Immutable once built and reused for every page request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchDefinition {
    pub guid: String,
    pub families: Vec<String>,
    #[serde(default)]
    pub filter: SearchFilter,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

impl SearchDefinition {
    /// Builds a search whose guid is derived from its content.
    ///
    /// Families are sorted and de-duplicated first, so the guid does not depend on the order
    /// in which they were supplied.
    pub fn new(families: Vec<String>, filter: SearchFilter) -> Self {
        let families = normalize_families(families);
        let guid = hash_search_identity(&filter, &families);
        Self {
            guid,
            families,
            filter,
            sort: None,
        }
    }

    pub fn with_guid(guid: impl Into<String>, families: Vec<String>, filter: SearchFilter) -> Self {
        Self {
            guid: guid.into(),
            families: normalize_families(families),
            filter,
            sort: None,
        }
    }

    pub fn sort(mut self, sort: &str) -> Self {
        self.sort = Some(sort.to_string());
        self
    }

    pub fn locus(&self) -> Option<&LocusSpec> {
        self.filter.locus.as_ref()
    }
}

fn normalize_families(mut families: Vec<String>) -> Vec<String> {
    families.sort();
    families.dedup();
    families
}

/// A request for one page (or everything, with `load_all`) of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: usize,
    pub num_results: usize,
    pub load_all: bool,
    pub skip_genotype_filter: bool,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            num_results: DEFAULT_PAGE_SIZE,
            load_all: false,
            skip_genotype_filter: false,
        }
    }
}

impl PageRequest {
    pub fn page(page: usize, num_results: usize) -> Self {
        Self {
            page,
            num_results,
            ..Default::default()
        }
    }

    pub fn load_all() -> Self {
        Self {
            load_all: true,
            ..Default::default()
        }
    }

    /// Half-open index range `[start, end)` covered by this request, clamped to `total`.
    pub fn range(&self, total: Option<u64>) -> (usize, usize) {
        let start = self.page.saturating_sub(1).saturating_mul(self.num_results);
        let mut end = self.page.saturating_mul(self.num_results);
        if let Some(total) = total {
            end = end.min(total as usize);
        }
        (start.min(end), end)
    }
}

/// Variant ordering understood by the backends.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SortKey {
    Xpos,
    FamilyGuid,
    /// Ascending by a numeric variant field; variants lacking the field sort last.
    Field(String),
}

impl SortKey {
    /// Parses a caller-supplied sort. Missing or empty means genomic position.
    pub fn parse(sort: Option<&str>) -> Self {
        match sort.map(str::trim) {
            None | Some("") | Some(XPOS_SORT_KEY) => SortKey::Xpos,
            Some(FAMILY_GUID_SORT_KEY) => SortKey::FamilyGuid,
            Some(other) => SortKey::Field(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SortKey::Xpos => XPOS_SORT_KEY,
            SortKey::FamilyGuid => FAMILY_GUID_SORT_KEY,
            SortKey::Field(name) => name,
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
