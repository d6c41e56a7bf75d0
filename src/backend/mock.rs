//! Spy wrapper around [`MemoryVariantIndex`] for tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::model::{DatasetType, Variant};

use super::error::{BackendError, BackendErrorKind, BackendResult};
use super::memory::MemoryVariantIndex;
use super::strategy::VariantIndex;
use super::types::{ErrorTable, GeneAggregation, IndexPage, IndexQuery};

/// Counts calls, records requested windows and can be told to fail.
#[derive(Debug, Default)]
pub struct MockVariantIndex {
    inner: MemoryVariantIndex,
    search_calls: AtomicUsize,
    aggregation_calls: AtomicUsize,
    lookup_calls: AtomicUsize,
    windows: Mutex<Vec<(usize, usize)>>,
    failure: Mutex<Option<BackendErrorKind>>,
    offline: Mutex<bool>,
}

impl MockVariantIndex {
    pub fn new(variants: Vec<Variant>) -> Self {
        Self {
            inner: MemoryVariantIndex::new(variants),
            ..Default::default()
        }
    }

    pub fn inner(&self) -> &MemoryVariantIndex {
        &self.inner
    }

    /// Every subsequent call fails with `kind` until cleared with `None`.
    pub fn fail_with(&self, kind: Option<BackendErrorKind>) {
        *self.failure.lock() = kind;
    }

    pub fn set_ready(&self, ready: bool) {
        *self.offline.lock() = !ready;
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn aggregation_calls(&self) -> usize {
        self.aggregation_calls.load(Ordering::SeqCst)
    }

    pub fn lookup_calls(&self) -> usize {
        self.lookup_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.search_calls() + self.aggregation_calls() + self.lookup_calls()
    }

    /// `(from, size)` of every search call, in order.
    pub fn windows(&self) -> Vec<(usize, usize)> {
        self.windows.lock().clone()
    }

    fn check_failure(&self) -> BackendResult<()> {
        match *self.failure.lock() {
            Some(kind) => Err(BackendError::new(kind, "injected failure")),
            None => Ok(()),
        }
    }
}

impl VariantIndex for MockVariantIndex {
    async fn ping(&self) -> BackendResult<()> {
        if *self.offline.lock() {
            Err(BackendError::unavailable("mock index not ready"))
        } else {
            Ok(())
        }
    }

    async fn search(&self, query: &IndexQuery, from: usize, size: usize) -> BackendResult<IndexPage> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.windows.lock().push((from, size));
        self.check_failure()?;
        self.inner.search(query, from, size).await
    }

    async fn gene_aggregation(&self, query: &IndexQuery) -> BackendResult<GeneAggregation> {
        self.aggregation_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        self.inner.gene_aggregation(query).await
    }

    async fn get_variants(
        &self,
        families: &[String],
        variant_ids: &[String],
        dataset_type: Option<DatasetType>,
        return_all_queried_families: bool,
    ) -> BackendResult<Vec<Variant>> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        self.inner
            .get_variants(families, variant_ids, dataset_type, return_all_queried_families)
            .await
    }

    fn error_table(&self) -> ErrorTable {
        self.inner.error_table()
    }
}
