use std::sync::Arc;

use serde_json::json;

use super::*;
use crate::cache::CachedSearchResult;
use crate::locus::LocusResolution;
use crate::model::{
    DatasetType, FrequencyFilter, GeneCounts, Interval, PageRequest, SearchFilter, SortKey, Variant,
};

fn sample_variants() -> Vec<Variant> {
    vec![
        Variant::new("1", 100, "A", "G")
            .gene("ENSG1")
            .family("F1")
            .consequence("missense_variant")
            .population_af("gnomad", 0.01)
            .field("cadd", json!(20.0)),
        Variant::new("1", 200, "C", "T")
            .gene("ENSG1")
            .family("F2")
            .consequence("synonymous_variant")
            .field("cadd", json!(5.0)),
        Variant::new("2", 50, "G", "A")
            .gene("ENSG2")
            .family("F1")
            .family("F2")
            .consequence("missense_variant")
            .population_af("gnomad", 0.2)
            .rsid("rs123"),
        Variant::new("X", 10, "T", "C")
            .gene("ENSG3")
            .family("F1")
            .consequence("stop_gained")
            .dataset_type(DatasetType::Sv),
        Variant::new("3", 5, "A", "C").family("F3"),
    ]
}

fn families(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn query(names: &[&str], sort: SortKey, filter: FilterSpec) -> IndexQuery {
    IndexQuery {
        families: families(names),
        sort,
        filter,
    }
}

fn ids(variants: &[Variant]) -> Vec<&str> {
    variants.iter().map(|v| v.variant_id.as_str()).collect()
}

fn cached(total: Option<u64>, loaded: &[Variant]) -> CachedSearchResult {
    let mut result = CachedSearchResult::new();
    if let Some(total) = total {
        result.set_total_results(total);
    }
    result.set_state(ALL_RESULTS_FIELD, &loaded.to_vec()).unwrap();
    result
}

#[test]
fn test_variant_previous_results_empty_cache_queries() {
    let strategy = VariantSearch::new(Arc::new(MockVariantIndex::default()));
    let request = PageRequest::page(1, 10);

    let outcome = strategy.process_previous_results(&CachedSearchResult::new(), &request);
    assert_eq!(outcome, PreviousResults::Query(request));
}

#[test]
fn test_variant_previous_results_page_inside_prefix() {
    let strategy = VariantSearch::new(Arc::new(MockVariantIndex::default()));
    let loaded = &sample_variants()[..3];
    let previous = cached(Some(5), loaded);

    match strategy.process_previous_results(&previous, &PageRequest::page(1, 2)) {
        PreviousResults::Loaded(variants) => assert_eq!(variants, loaded[..2].to_vec()),
        other => panic!("expected cache hit, got {:?}", other),
    }

    let outcome = strategy.process_previous_results(&previous, &PageRequest::page(2, 2));
    assert_eq!(outcome, PreviousResults::Query(PageRequest::page(2, 2)));
}

#[test]
fn test_variant_previous_results_last_page_clamped_to_total() {
    let strategy = VariantSearch::new(Arc::new(MockVariantIndex::default()));
    let loaded = &sample_variants()[..3];
    let previous = cached(Some(3), loaded);

    match strategy.process_previous_results(&previous, &PageRequest::page(2, 2)) {
        PreviousResults::Loaded(variants) => assert_eq!(ids(&variants), vec![loaded[2].variant_id.as_str()]),
        other => panic!("expected cache hit, got {:?}", other),
    }
}

#[test]
fn test_variant_previous_results_load_all() {
    let strategy = VariantSearch::with_max_variants(Arc::new(MockVariantIndex::default()), 50);

    let outcome = strategy.process_previous_results(&CachedSearchResult::new(), &PageRequest::load_all());
    match outcome {
        PreviousResults::Query(request) => {
            assert!(request.load_all);
            assert_eq!(request.num_results, 50);
        }
        other => panic!("expected query, got {:?}", other),
    }

    let loaded = &sample_variants()[..3];
    let previous = cached(Some(3), loaded);
    match strategy.process_previous_results(&previous, &PageRequest::load_all()) {
        PreviousResults::Loaded(variants) => assert_eq!(variants.len(), 3),
        other => panic!("expected cache hit, got {:?}", other),
    }

    let partial = cached(Some(4), loaded);
    match strategy.process_previous_results(&partial, &PageRequest::load_all()) {
        PreviousResults::Query(request) => assert_eq!(request.num_results, 4),
        other => panic!("expected query, got {:?}", other),
    }

    let mut second_page = PageRequest::load_all();
    second_page.page = 2;
    match strategy.process_previous_results(&previous, &second_page) {
        PreviousResults::Loaded(variants) => assert_eq!(variants.len(), 3),
        other => panic!("expected cache hit, got {:?}", other),
    }
    match strategy.process_previous_results(&CachedSearchResult::new(), &second_page) {
        PreviousResults::Query(request) => assert_eq!(request.range(None), (0, 50)),
        other => panic!("expected query, got {:?}", other),
    }
}

#[test]
fn test_variant_previous_results_load_all_empty_total() {
    let strategy = VariantSearch::new(Arc::new(MockVariantIndex::default()));
    let previous = cached(Some(0), &[]);

    let outcome = strategy.process_previous_results(&previous, &PageRequest::load_all());
    assert_eq!(outcome, PreviousResults::Loaded(Vec::new()));
}

#[tokio::test]
async fn test_session_requires_single_filter() {
    let strategy = VariantSearch::new(Arc::new(MockVariantIndex::new(sample_variants())));
    let mut session = strategy.construct(&families(&["F1"]), CachedSearchResult::new(), None, None);

    let err = session.search(1, 10).await.expect_err("search before filter");
    assert_eq!(err.kind, BackendErrorKind::InvalidSession);

    session.filter(FilterSpec::default()).expect("first filter");
    let err = session
        .filter(FilterSpec::default())
        .expect_err("second filter");
    assert_eq!(err.kind, BackendErrorKind::InvalidSession);
}

#[tokio::test]
async fn test_session_extends_loaded_prefix() {
    let index = Arc::new(MockVariantIndex::new(sample_variants()));
    let strategy = VariantSearch::new(index.clone());
    let fams = families(&["F1", "F2"]);

    let mut session = strategy.construct(&fams, CachedSearchResult::new(), Some("user@test"), None);
    session.filter(FilterSpec::default()).unwrap();
    let first = session.search(1, 2).await.unwrap();
    assert_eq!(first.len(), 2);
    let previous = session.into_previous_results();
    assert_eq!(previous.total_results(), Some(4));

    let mut session = strategy.construct(&fams, previous, Some("user@test"), None);
    session.filter(FilterSpec::default()).unwrap();
    let second = session.search(2, 2).await.unwrap();
    assert_eq!(second.len(), 2);

    assert_eq!(index.windows(), vec![(0, 2), (2, 2)]);
    let loaded: Vec<Variant> = session
        .previous_results()
        .state(ALL_RESULTS_FIELD)
        .unwrap();
    assert_eq!(loaded.len(), 4);
    assert_eq!(loaded[2..].to_vec(), second);
}

#[tokio::test]
async fn test_session_page_past_total_is_empty() {
    let index = Arc::new(MockVariantIndex::new(sample_variants()));
    let strategy = VariantSearch::new(index.clone());

    let mut session = strategy.construct(&families(&["F1"]), CachedSearchResult::new(), None, None);
    session.filter(FilterSpec::default()).unwrap();
    let page = session.search(5, 10).await.unwrap();

    assert!(page.is_empty());
    assert_eq!(session.previous_results().total_results(), Some(3));
}

#[tokio::test]
async fn test_session_propagates_backend_failure() {
    let index = Arc::new(MockVariantIndex::new(sample_variants()));
    index.fail_with(Some(BackendErrorKind::Timeout));
    let strategy = VariantSearch::new(index.clone());

    let mut session = strategy.construct(&families(&["F1"]), CachedSearchResult::new(), None, None);
    session.filter(FilterSpec::default()).unwrap();
    let err = session.search(1, 10).await.expect_err("injected failure");

    assert_eq!(err.kind, BackendErrorKind::Timeout);
    assert!(session.previous_results().is_empty());
}

#[test]
fn test_gene_agg_previous_results() {
    let strategy = GeneAggSearch::new(Arc::new(MockVariantIndex::default()));
    let request = PageRequest::default();

    assert_eq!(
        strategy.process_previous_results(&CachedSearchResult::new(), &request),
        PreviousResults::Query(request)
    );

    let variants = sample_variants();
    let partial = cached(Some(3), &variants[..2]);
    assert!(!strategy.process_previous_results(&partial, &request).is_loaded());

    let full = cached(Some(2), &variants[..2]);
    match strategy.process_previous_results(&full, &request) {
        PreviousResults::Loaded(counts) => {
            let gene = counts.get("ENSG1").expect("tallied gene");
            assert_eq!(gene.total, 2);
            assert_eq!(gene.families.get("F1"), Some(&1));
            assert_eq!(gene.families.get("F2"), Some(&1));
        }
        other => panic!("expected tally, got {:?}", other),
    }
}

#[test]
fn test_gene_agg_previous_results_prefers_stored_counts() {
    let strategy = GeneAggSearch::new(Arc::new(MockVariantIndex::default()));
    let stored = GeneCounts::tally(&sample_variants()[3..4], None);

    let mut previous = CachedSearchResult::new();
    previous.set_total_results(10);
    previous.set_state(GENE_AGGS_FIELD, &stored).unwrap();

    assert_eq!(
        strategy.process_previous_results(&previous, &PageRequest::default()),
        PreviousResults::Loaded(stored)
    );
}

#[tokio::test]
async fn test_gene_agg_session_stores_counts() {
    let index = Arc::new(MockVariantIndex::new(sample_variants()));
    let strategy = GeneAggSearch::new(index.clone());

    let mut session = strategy.construct(
        &families(&["F1"]),
        CachedSearchResult::new(),
        None,
        Some("cadd"),
    );
    session.filter(FilterSpec::default()).unwrap();
    let counts = session.search(1, 100).await.unwrap();

    assert_eq!(index.aggregation_calls(), 1);
    assert_eq!(index.search_calls(), 0);
    assert_eq!(counts.len(), 3);
    assert_eq!(counts.get("ENSG2").unwrap().families.get("F2"), None);

    let previous = session.into_previous_results();
    assert_eq!(previous.total_results(), Some(3));
    assert_eq!(previous.state::<GeneCounts>(GENE_AGGS_FIELD), Some(counts));
}

#[tokio::test]
async fn test_memory_index_genotype_scope() {
    let index = MemoryVariantIndex::new(sample_variants());

    let page = index
        .search(&query(&["F2"], SortKey::Xpos, FilterSpec::default()), 0, 10)
        .await
        .unwrap();
    assert_eq!(ids(&page.variants), vec!["1-200-C-T", "2-50-G-A"]);
    assert!(page.variants.iter().all(|v| v.family_guids == vec!["F2".to_string()]));

    let skipped = FilterSpec {
        skip_genotype_filter: true,
        ..Default::default()
    };
    let page = index
        .search(&query(&["F2"], SortKey::Xpos, skipped), 0, 10)
        .await
        .unwrap();
    assert_eq!(page.total, 5);
}

#[tokio::test]
async fn test_memory_index_location_filters() {
    let index = MemoryVariantIndex::new(sample_variants());
    let fams = ["F1", "F2", "F3"];

    let by_gene = FilterSpec::new(
        SearchFilter::default(),
        LocusResolution {
            genes: vec!["ENSG1".to_string()],
            intervals: vec![Interval {
                chrom: "X".to_string(),
                start: 1,
                end: 20,
            }],
            ..Default::default()
        },
        false,
    );
    let page = index
        .search(&query(&fams, SortKey::Xpos, by_gene), 0, 10)
        .await
        .unwrap();
    assert_eq!(ids(&page.variants), vec!["1-100-A-G", "1-200-C-T", "X-10-T-C"]);

    let by_rsid = FilterSpec {
        rs_ids: Some(vec!["rs123".to_string()]),
        ..Default::default()
    };
    let page = index
        .search(&query(&fams, SortKey::Xpos, by_rsid), 0, 10)
        .await
        .unwrap();
    assert_eq!(ids(&page.variants), vec!["2-50-G-A"]);

    let by_id = FilterSpec {
        variant_ids: Some(vec!["3-5-A-C".to_string(), "9-9-A-C".to_string()]),
        ..Default::default()
    };
    let page = index
        .search(&query(&fams, SortKey::Xpos, by_id), 0, 10)
        .await
        .unwrap();
    assert_eq!(page.total, 1);
}

#[tokio::test]
async fn test_memory_index_annotation_and_frequency_filters() {
    let index = MemoryVariantIndex::new(sample_variants());

    let mut filter = SearchFilter::default();
    filter.annotations = Some([("missense".to_string(), vec!["missense_variant".to_string()])].into());
    filter.frequencies = Some([("gnomad".to_string(), FrequencyFilter { af: Some(0.05) })].into());

    let page = index
        .search(
            &query(&["F1", "F2"], SortKey::Xpos, FilterSpec::new(filter, LocusResolution::default(), false)),
            0,
            10,
        )
        .await
        .unwrap();
    assert_eq!(ids(&page.variants), vec!["1-100-A-G"]);
}

#[tokio::test]
async fn test_memory_index_sorting() {
    let index = MemoryVariantIndex::new(sample_variants());
    let fams = ["F1", "F2"];

    let page = index
        .search(&query(&fams, SortKey::Xpos, FilterSpec::default()), 0, 10)
        .await
        .unwrap();
    assert_eq!(ids(&page.variants), vec!["1-100-A-G", "1-200-C-T", "2-50-G-A", "X-10-T-C"]);

    let page = index
        .search(&query(&fams, SortKey::parse(Some("cadd")), FilterSpec::default()), 0, 10)
        .await
        .unwrap();
    assert_eq!(ids(&page.variants), vec!["1-200-C-T", "1-100-A-G", "2-50-G-A", "X-10-T-C"]);

    let page = index
        .search(&query(&fams, SortKey::Xpos, FilterSpec::default()), 1, 2)
        .await
        .unwrap();
    assert_eq!(ids(&page.variants), vec!["1-200-C-T", "2-50-G-A"]);
    assert_eq!(page.total, 4);
}

#[tokio::test]
async fn test_memory_index_get_variants() {
    let index = MemoryVariantIndex::new(sample_variants());
    let wanted = vec!["X-10-T-C".to_string(), "1-100-A-G".to_string(), "1-200-C-T".to_string()];

    let found = index
        .get_variants(&families(&["F1"]), &wanted, None, false)
        .await
        .unwrap();
    assert_eq!(ids(&found), vec!["1-100-A-G", "X-10-T-C"]);

    let found = index
        .get_variants(&families(&["F1"]), &wanted, Some(DatasetType::Sv), false)
        .await
        .unwrap();
    assert_eq!(ids(&found), vec!["X-10-T-C"]);
}

#[tokio::test]
async fn test_memory_index_get_variants_all_queried_families() {
    let index = MemoryVariantIndex::new(sample_variants());
    let wanted = vec!["1-200-C-T".to_string(), "3-5-A-C".to_string()];

    let found = index
        .get_variants(&families(&["F2", "F9"]), &wanted, None, true)
        .await
        .unwrap();
    assert_eq!(ids(&found), vec!["1-200-C-T"]);
    assert_eq!(found[0].family_guids, families(&["F2", "F9"]));
}

#[tokio::test]
async fn test_memory_index_normalizes_inserted_variants() {
    let index = MemoryVariantIndex::default();
    let mut variant = Variant::new("1", 10, "A", "C").family("F1");
    variant.chrom = "chrMT".to_string();
    variant.xpos = 0;
    index.insert(variant);

    let page = index
        .search(&query(&["F1"], SortKey::Xpos, FilterSpec::default()), 0, 1)
        .await
        .unwrap();
    assert_eq!(page.variants[0].chrom, "M");
    assert_eq!(page.variants[0].xpos, 25_000_000_010);
}

#[test]
fn test_index_file_loads_variants_and_genes() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let body = json!({
        "variants": [{
            "variantId": "1-100-A-G",
            "chrom": "1",
            "pos": 100,
            "ref": "A",
            "alt": "G",
            "geneIds": ["ENSG00000012048"],
            "familyGuids": ["F1"],
            "cadd": 12.5
        }],
        "genes": {"BRCA1": "ENSG00000012048"}
    });
    std::fs::write(file.path(), body.to_string()).unwrap();

    let (index, catalog) = IndexFile::load(file.path()).unwrap().into_parts();
    assert_eq!(index.len(), 1);
    assert_eq!(catalog.resolve("brca1"), Some("ENSG00000012048".to_string()));

    let err = IndexFile::load(std::path::Path::new("/nonexistent/index.json")).unwrap_err();
    assert_eq!(err.kind, BackendErrorKind::Unavailable);
}

#[test]
fn test_error_table() {
    let table = MemoryVariantIndex::default().error_table();
    assert!(table.statuses.contains(&(BackendErrorKind::Timeout, 504)));
    assert!(table.error_log_kinds.contains(&BackendErrorKind::Unavailable));
}
