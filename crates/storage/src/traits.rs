use async_trait::async_trait;

use crate::error::StoreError;
use crate::record::{BatchRunRecord, BreakdownRecord};

/// The storage trait for appraise persistence backends.
///
/// A `BreakdownStore` implementation keeps valuation breakdown snapshots
/// and batch run records. It never evaluates anything; the engine hands
/// it finished [`BreakdownRecord`]s.
///
/// ## Supersede Semantics
///
/// Storage is append-only per listing. A `put` supersedes the listing's
/// previous latest record; it never mutates or deletes stored history.
/// Whether history is compacted or retained forever is a backend policy,
/// but within one process lifetime `history` must return every record
/// that was put.
///
/// ## Idempotency
///
/// Re-putting the record that is already latest for its listing (same
/// digest) is a no-op: no new history entry appears. A digest that
/// occurred earlier in history but is no longer latest is appended
/// again like any other record -- it supersedes the current latest.
///
/// ## Thread Safety
///
/// Implementations must be `Send + Sync + 'static` so a store can be
/// shared across async task boundaries while a batch run writes results.
#[async_trait]
pub trait BreakdownStore: Send + Sync + 'static {
    /// Store a breakdown record, superseding the listing's latest.
    async fn put(&self, record: BreakdownRecord) -> Result<(), StoreError>;

    /// The most recently put record for a listing. `Ok(None)` when the
    /// listing has no stored breakdown.
    async fn latest(&self, listing_id: i64) -> Result<Option<BreakdownRecord>, StoreError>;

    /// Every stored record for a listing, newest first. Empty when the
    /// listing has no stored breakdown.
    async fn history(&self, listing_id: i64) -> Result<Vec<BreakdownRecord>, StoreError>;

    /// Record the outcome of one batch recalculation run.
    async fn record_batch_run(&self, record: BatchRunRecord) -> Result<(), StoreError>;

    /// Every recorded batch run, newest first.
    async fn batch_runs(&self) -> Result<Vec<BatchRunRecord>, StoreError>;
}
