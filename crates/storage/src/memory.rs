//! In-memory reference backend.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::record::{BatchRunRecord, BreakdownRecord};
use crate::traits::BreakdownStore;

/// A `BreakdownStore` over in-process maps.
///
/// The reference implementation used by tests and the conformance suite;
/// also usable as a cache in front of a durable backend. History is kept
/// per listing in put order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    /// Per-listing history, oldest first. `last()` is the latest.
    breakdowns: BTreeMap<i64, Vec<BreakdownRecord>>,
    /// Batch runs in record order, oldest first.
    batch_runs: Vec<BatchRunRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

#[async_trait]
impl BreakdownStore for MemoryStore {
    async fn put(&self, record: BreakdownRecord) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let history = inner.breakdowns.entry(record.listing_id).or_default();
        // Idempotent re-put: the latest record already carries this digest.
        if history.last().is_some_and(|latest| latest.digest == record.digest) {
            return Ok(());
        }
        history.push(record);
        Ok(())
    }

    async fn latest(&self, listing_id: i64) -> Result<Option<BreakdownRecord>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .breakdowns
            .get(&listing_id)
            .and_then(|history| history.last().cloned()))
    }

    async fn history(&self, listing_id: i64) -> Result<Vec<BreakdownRecord>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .breakdowns
            .get(&listing_id)
            .map(|history| history.iter().rev().cloned().collect())
            .unwrap_or_default())
    }

    async fn record_batch_run(&self, record: BatchRunRecord) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.batch_runs.push(record);
        Ok(())
    }

    async fn batch_runs(&self) -> Result<Vec<BatchRunRecord>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.batch_runs.iter().rev().cloned().collect())
    }
}
