use std::collections::HashMap;

use tracing::debug;

use crate::model::{Interval, LocusSpec, VariantIdentifier};

use super::error::{IdentifierError, LocusError};
use super::xpos::{chrom_index, get_xpos, normalize_chrom, strip_chr_prefix};
use crate::constants::{MAX_POSITION, MIN_POSITION};

/// Resolves gene tokens to gene ids.
///
/// Ensembl gene ids (`ENSG...`, version suffix dropped) are accepted as-is; anything else
/// must be a known symbol (case-insensitive).
#[derive(Debug, Clone, Default)]
pub struct GeneCatalog {
    symbols: HashMap<String, String>,
}

impl GeneCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_symbols<I, S, G>(symbols: I) -> Self
    where
        I: IntoIterator<Item = (S, G)>,
        S: AsRef<str>,
        G: Into<String>,
    {
        Self {
            symbols: symbols
                .into_iter()
                .map(|(symbol, gene_id)| (symbol.as_ref().to_ascii_uppercase(), gene_id.into()))
                .collect(),
        }
    }

    pub fn insert(&mut self, symbol: &str, gene_id: &str) {
        self.symbols
            .insert(symbol.to_ascii_uppercase(), gene_id.to_string());
    }

    pub fn resolve(&self, token: &str) -> Option<String> {
        let upper = token.to_ascii_uppercase();
        if let Some(rest) = upper.strip_prefix("ENSG") {
            let digits = rest.split('.').next().unwrap_or_default();
            if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
                return Some(format!("ENSG{}", digits));
            }
        }
        self.symbols.get(&upper).cloned()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Genes and intervals parsed from `rawItems`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocusItems {
    pub genes: Vec<String>,
    pub intervals: Vec<Interval>,
    pub invalid_items: Vec<String>,
}

/// rsIDs and variant identifiers parsed from `rawVariantItems`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantItems {
    pub rs_ids: Vec<String>,
    pub variant_ids: Vec<String>,
    pub invalid_items: Vec<String>,
}

/// Search scope derived from a [`LocusSpec`]. At most one of the two groups is populated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocusResolution {
    pub genes: Vec<String>,
    pub intervals: Vec<Interval>,
    pub rs_ids: Option<Vec<String>>,
    pub variant_ids: Option<Vec<String>>,
}

impl LocusResolution {
    pub fn has_genes_or_intervals(&self) -> bool {
        !self.genes.is_empty() || !self.intervals.is_empty()
    }

    /// Number of explicitly requested variant identifiers, if this is an identifier search.
    pub fn variant_id_count(&self) -> Option<usize> {
        self.variant_ids
            .as_ref()
            .filter(|ids| !ids.is_empty())
            .map(Vec::len)
    }
}

fn split_items(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
}

/// Parses `chr1:100-200` (prefix optional). `None` if the token is not a valid interval.
pub fn parse_interval(token: &str) -> Option<Interval> {
    let (chrom, range) = token.split_once(':')?;
    let (start, end) = range.split_once('-')?;
    let start: u64 = start.trim().parse().ok()?;
    let end: u64 = end.trim().parse().ok()?;

    chrom_index(chrom)?;
    if start < MIN_POSITION || end > MAX_POSITION || start > end {
        return None;
    }

    Some(Interval {
        chrom: normalize_chrom(chrom),
        start,
        end,
    })
}

/// Splits `rawItems` into genes and intervals; unrecognized tokens are reported, not dropped.
pub fn parse_locus_list_items(locus: Option<&LocusSpec>, catalog: &GeneCatalog) -> LocusItems {
    let mut items = LocusItems::default();
    let Some(raw) = locus.and_then(|l| l.raw_items.as_deref()) else {
        return items;
    };

    for token in split_items(raw) {
        if token.contains(':') {
            match parse_interval(token) {
                Some(interval) => items.intervals.push(interval),
                None => items.invalid_items.push(token.to_string()),
            }
        } else if let Some(gene_id) = catalog.resolve(token) {
            if !items.genes.contains(&gene_id) {
                items.genes.push(gene_id);
            }
        } else {
            items.invalid_items.push(token.to_string());
        }
    }

    items
}

/// Classifies `rawVariantItems` tokens as rsIDs or variant identifiers.
///
/// Every token is examined even after a failure; failures land in `invalid_items`.
/// Accepted identifiers are kept as typed, minus a leading `chr`.
pub fn parse_variant_items<P>(locus: Option<&LocusSpec>, parse_identifier: P) -> VariantItems
where
    P: Fn(&str) -> Result<VariantIdentifier, IdentifierError>,
{
    let mut items = VariantItems::default();
    let Some(raw) = locus.and_then(|l| l.raw_variant_items.as_deref()) else {
        return items;
    };

    for token in split_items(raw) {
        if token.starts_with("rs") {
            items.rs_ids.push(token.to_string());
            continue;
        }

        let validated = parse_identifier(token).and_then(|id| get_xpos(&id.chrom, id.pos));
        match validated {
            Ok(_) => items
                .variant_ids
                .push(strip_chr_prefix(token).to_string()),
            Err(e) => {
                debug!(token = token, kind = ?e.kind(), error = %e, "Rejected variant token");
                items.invalid_items.push(token.to_string());
            }
        }
    }

    items
}

/// Resolves a search's locus. Genes and intervals win; raw variant items are only parsed
/// when neither is present.
pub fn resolve_locus<P>(
    locus: Option<&LocusSpec>,
    catalog: &GeneCatalog,
    parse_identifier: P,
) -> Result<LocusResolution, LocusError>
where
    P: Fn(&str) -> Result<VariantIdentifier, IdentifierError>,
{
    let LocusItems {
        genes,
        intervals,
        invalid_items,
    } = parse_locus_list_items(locus, catalog);
    if !invalid_items.is_empty() {
        return Err(LocusError::InvalidGenesOrIntervals(invalid_items));
    }

    if !genes.is_empty() || !intervals.is_empty() {
        return Ok(LocusResolution {
            genes,
            intervals,
            ..Default::default()
        });
    }

    let VariantItems {
        rs_ids,
        variant_ids,
        invalid_items,
    } = parse_variant_items(locus, parse_identifier);
    if !invalid_items.is_empty() {
        return Err(LocusError::InvalidVariants(invalid_items));
    }
    if !rs_ids.is_empty() && !variant_ids.is_empty() {
        return Err(LocusError::MixedVariantNotation);
    }

    Ok(LocusResolution {
        rs_ids: Some(rs_ids).filter(|ids| !ids.is_empty()),
        variant_ids: Some(variant_ids).filter(|ids| !ids.is_empty()),
        ..Default::default()
    })
}
