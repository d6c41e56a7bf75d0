use serde::{Deserialize, Serialize};

/// Raw locus input as submitted with a search.
///
/// `raw_items` holds genes and intervals, `raw_variant_items` holds variant identifiers or
/// rsIDs. Both are free text separated by commas and/or whitespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocusSpec {
    #[serde(
        rename = "rawItems",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub raw_items: Option<String>,

    #[serde(
        rename = "rawVariantItems",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub raw_variant_items: Option<String>,

    #[serde(
        rename = "genomeVersion",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub genome_version: Option<String>,
}

impl LocusSpec {
    pub fn from_items(raw_items: &str) -> Self {
        Self {
            raw_items: Some(raw_items.to_string()),
            ..Default::default()
        }
    }

    pub fn from_variant_items(raw_variant_items: &str) -> Self {
        Self {
            raw_variant_items: Some(raw_variant_items.to_string()),
            ..Default::default()
        }
    }
}

/// Closed genomic interval on one chromosome (chromosome stored without `chr`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
}

impl Interval {
    #[inline]
    pub fn contains(&self, chrom: &str, pos: u64) -> bool {
        self.chrom == chrom && self.start <= pos && pos <= self.end
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}-{}", self.chrom, self.start, self.end)
    }
}

/// A parsed `chrom-pos-ref-alt` identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariantIdentifier {
    pub chrom: String,
    pub pos: u64,
    pub ref_allele: String,
    pub alt_allele: String,
}

impl std::fmt::Display for VariantIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}-{}-{}",
            self.chrom, self.pos, self.ref_allele, self.alt_allele
        )
    }
}
