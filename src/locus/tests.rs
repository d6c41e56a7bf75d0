use std::cell::Cell;

use super::*;
use crate::model::{Interval, LocusSpec};

fn locus(raw_items: Option<&str>, raw_variant_items: Option<&str>) -> LocusSpec {
    LocusSpec {
        raw_items: raw_items.map(str::to_string),
        raw_variant_items: raw_variant_items.map(str::to_string),
        genome_version: None,
    }
}

fn catalog() -> GeneCatalog {
    GeneCatalog::with_symbols([("BRCA1", "ENSG00000012048"), ("TTN", "ENSG00000155657")])
}

#[test]
fn test_get_xpos() {
    assert_eq!(get_xpos("1", 12345), Ok(1_000_012_345));
    assert_eq!(get_xpos("chr2", 1), Ok(2_000_000_001));
    assert_eq!(get_xpos("Y", 10), Ok(24_000_000_010));
    assert_eq!(get_xpos("MT", 10), Ok(25_000_000_010));
}

#[test]
fn test_get_xpos_rejects_bad_coordinates() {
    let err = get_xpos("23", 100).expect_err("unknown chromosome");
    assert_eq!(err.kind(), IdentifierErrorKind::InvalidCoordinate);

    let err = get_xpos("1", 0).expect_err("position zero");
    assert_eq!(err, IdentifierError::PositionOutOfRange { pos: 0 });

    let err = get_xpos("1", 300_000_001).expect_err("position too large");
    assert_eq!(err.kind(), IdentifierErrorKind::InvalidCoordinate);
}

#[test]
fn test_parse_variant_id() {
    let id = parse_variant_id("chr1-12345-a-G").expect("should parse");
    assert_eq!(id.chrom, "1");
    assert_eq!(id.pos, 12345);
    assert_eq!(id.ref_allele, "A");
    assert_eq!(id.alt_allele, "G");
    assert_eq!(id.to_string(), "1-12345-A-G");
}

#[test]
fn test_parse_variant_id_malformed() {
    for token in ["not-a-variant", "1-abc-A-G", "1-100-A", "1-100-A-G-T", "1-100--G", "-100-A-G"] {
        let err = parse_variant_id(token).expect_err(token);
        assert_eq!(err.kind(), IdentifierErrorKind::MalformedIdentifier, "{token}");
    }
}

#[test]
fn test_parse_interval() {
    assert_eq!(
        parse_interval("chr2:100-200"),
        Some(Interval {
            chrom: "2".to_string(),
            start: 100,
            end: 200
        })
    );
    assert_eq!(parse_interval("chr2:200-100"), None);
    assert_eq!(parse_interval("chr99:100-200"), None);
    assert_eq!(parse_interval("2:0-10"), None);
    assert_eq!(parse_interval("2:10"), None);
}

#[test]
fn test_gene_catalog_resolve() {
    let catalog = catalog();
    assert_eq!(catalog.resolve("brca1").as_deref(), Some("ENSG00000012048"));
    assert_eq!(
        catalog.resolve("ENSG00000186092.4").as_deref(),
        Some("ENSG00000186092")
    );
    assert_eq!(catalog.resolve("NOTAGENE"), None);
    assert_eq!(catalog.resolve("ENSGABC"), None);
}

#[test]
fn test_parse_locus_list_items() {
    let spec = locus(Some("BRCA1, chr1:100-200\nTTN brca1 FAKE 1:5-2"), None);
    let items = parse_locus_list_items(Some(&spec), &catalog());

    assert_eq!(
        items.genes,
        vec!["ENSG00000012048".to_string(), "ENSG00000155657".to_string()]
    );
    assert_eq!(items.intervals.len(), 1);
    assert_eq!(items.invalid_items, vec!["FAKE".to_string(), "1:5-2".to_string()]);
}

#[test]
fn test_parse_variant_items_classification_and_normalization() {
    let spec = locus(None, Some("chr1-12345-A-G, rs123 not-a-variant 1-0-A-G 2-999-C-T"));
    let items = parse_variant_items(Some(&spec), parse_variant_id);

    assert_eq!(items.rs_ids, vec!["rs123".to_string()]);
    assert_eq!(
        items.variant_ids,
        vec!["1-12345-A-G".to_string(), "2-999-C-T".to_string()]
    );
    assert_eq!(
        items.invalid_items,
        vec!["not-a-variant".to_string(), "1-0-A-G".to_string()]
    );
}

#[test]
fn test_parse_variant_items_strips_chr_in_any_case() {
    let spec = locus(None, Some("CHR1-100-A-G Chr2-50-G-A chrX-10-T-C"));
    let items = parse_variant_items(Some(&spec), parse_variant_id);

    assert_eq!(
        items.variant_ids,
        vec!["1-100-A-G".to_string(), "2-50-G-A".to_string(), "X-10-T-C".to_string()]
    );
    assert!(items.invalid_items.is_empty());
    assert_eq!(strip_chr_prefix("chrM"), "M");
    assert_eq!(strip_chr_prefix("ch"), "ch");
}

#[test]
fn test_parse_variant_items_without_input() {
    let items = parse_variant_items(None, parse_variant_id);
    assert_eq!(items, VariantItems::default());

    let spec = locus(Some("BRCA1"), None);
    let items = parse_variant_items(Some(&spec), parse_variant_id);
    assert_eq!(items, VariantItems::default());
}

#[test]
fn test_resolve_locus_genes_take_precedence() {
    let calls = Cell::new(0);
    let spy = |token: &str| {
        calls.set(calls.get() + 1);
        parse_variant_id(token)
    };

    let spec = locus(Some("BRCA1 chr3:10-20"), Some("1-12345-A-G rs1"));
    let resolution = resolve_locus(Some(&spec), &catalog(), spy).expect("should resolve");

    assert_eq!(calls.get(), 0);
    assert!(resolution.has_genes_or_intervals());
    assert!(resolution.rs_ids.is_none());
    assert!(resolution.variant_ids.is_none());
}

#[test]
fn test_resolve_locus_invalid_genes() {
    let spec = locus(Some("BRCA1 FAKE1 FAKE2"), None);
    let err = resolve_locus(Some(&spec), &catalog(), parse_variant_id).expect_err("invalid");
    assert_eq!(err.to_string(), "Invalid genes/intervals: FAKE1, FAKE2");
}

#[test]
fn test_resolve_locus_invalid_variants() {
    let spec = locus(None, Some("1-100-A-G not-a-variant"));
    let err = resolve_locus(Some(&spec), &catalog(), parse_variant_id).expect_err("invalid");
    assert_eq!(err, LocusError::InvalidVariants(vec!["not-a-variant".into()]));
    assert!(err.to_string().contains("not-a-variant"));
}

#[test]
fn test_resolve_locus_mixed_notation() {
    let spec = locus(None, Some("1-12345-A-G rs123"));
    let err = resolve_locus(Some(&spec), &catalog(), parse_variant_id).expect_err("mixed");
    assert_eq!(err, LocusError::MixedVariantNotation);
}

#[test]
fn test_resolve_locus_variant_ids() {
    let spec = locus(None, Some("1-12345-A-G,2-999-C-T"));
    let resolution = resolve_locus(Some(&spec), &catalog(), parse_variant_id).expect("resolve");
    assert_eq!(resolution.variant_id_count(), Some(2));
    assert!(resolution.rs_ids.is_none());
}

#[test]
fn test_resolve_locus_empty() {
    let resolution = resolve_locus(None, &catalog(), parse_variant_id).expect("resolve");
    assert_eq!(resolution, LocusResolution::default());
    assert_eq!(resolution.variant_id_count(), None);
}
