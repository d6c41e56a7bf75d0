//! Test fixtures for integration tests.

use std::collections::BTreeMap;

use serde_json::json;
use tempfile::NamedTempFile;
use varcache::backend::IndexFile;
use varcache::model::{LocusSpec, SearchDefinition, SearchFilter, Variant};

pub const FAMILY_A: &str = "FAM_A";
pub const FAMILY_B: &str = "FAM_B";

pub const GENES: [(&str, &str); 4] = [
    ("GENE0", "ENSG00000000010"),
    ("GENE1", "ENSG00000000011"),
    ("GENE2", "ENSG00000000012"),
    ("GENE3", "ENSG00000000013"),
];

/// Twelve variants over chromosomes 1, 2 and X.
///
/// `FAM_A` carries the even-numbered ones, `FAM_B` every third; eight are carried by at
/// least one of the two families.
pub fn cohort() -> Vec<Variant> {
    (0..12u64)
        .map(|i| {
            let chrom = ["1", "2", "X"][(i % 3) as usize];
            let consequence = if i % 2 == 0 {
                "missense_variant"
            } else {
                "synonymous_variant"
            };
            let mut variant = Variant::new(chrom, 1_000 + i * 10, "A", "T")
                .gene(GENES[(i % 4) as usize].1)
                .consequence(consequence)
                .population_af("gnomad", i as f64 / 100.0)
                .field("cadd", json!(i as f64));
            if i % 2 == 0 {
                variant = variant.family(FAMILY_A);
            }
            if i % 3 == 0 {
                variant = variant.family(FAMILY_B);
            }
            variant
        })
        .collect()
}

pub fn both_families() -> Vec<String> {
    vec![FAMILY_A.to_string(), FAMILY_B.to_string()]
}

pub fn search_with_locus(families: Vec<String>, locus: Option<LocusSpec>) -> SearchDefinition {
    let filter = SearchFilter {
        locus,
        ..Default::default()
    };
    SearchDefinition::new(families, filter)
}

/// Writes the cohort and gene symbols as an index file.
pub fn write_index_file() -> NamedTempFile {
    let file = IndexFile {
        variants: cohort(),
        genes: GENES
            .iter()
            .map(|(symbol, id)| (symbol.to_string(), id.to_string()))
            .collect::<BTreeMap<_, _>>(),
    };
    let tmp = NamedTempFile::new().unwrap();
    std::fs::write(tmp.path(), serde_json::to_vec(&file).unwrap()).unwrap();
    tmp
}
