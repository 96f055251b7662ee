//! Batch recalculation across many listings.
//!
//! Evaluation is CPU-bound arithmetic with no shared mutable state, so
//! listings run on blocking threads in waves of at most `max_concurrency`
//! tasks. Each listing is isolated: an evaluation error, a provider error,
//! or a panic in one task becomes a failed entry for that listing and the
//! batch carries on. Results are re-sorted by listing id after the join so
//! reports are stable regardless of scheduling.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use appraise_core::{ListingSnapshot, ValuationConfig};

use crate::breakdown::ValuationBreakdown;
use crate::engine::{evaluate_listing, RulesetSelector};
use crate::error::EvalError;
use crate::provider::{ListingProvider, ProviderError};

// ──────────────────────────────────────────────
// Cancellation
// ──────────────────────────────────────────────

/// Cooperative cancellation handle shared between a batch run and its
/// caller. Checked before each wave is dispatched: in-flight evaluations
/// complete, remaining listings are reported as cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        CancelFlag::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

// ──────────────────────────────────────────────
// Results
// ──────────────────────────────────────────────

/// Why one listing in a batch produced no breakdown.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchError {
    Eval(EvalError),
    Provider(ProviderError),
    /// The batch was cancelled before this listing started.
    Cancelled,
    /// The evaluation task panicked. Isolated to this listing.
    Panicked { message: String },
}

impl std::fmt::Display for BatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchError::Eval(err) => write!(f, "{}", err),
            BatchError::Provider(err) => write!(f, "{}", err),
            BatchError::Cancelled => write!(f, "batch cancelled before evaluation"),
            BatchError::Panicked { message } => {
                write!(f, "evaluation task panicked: {}", message)
            }
        }
    }
}

impl std::error::Error for BatchError {}

/// One listing's failure within a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchItemError {
    pub listing_id: i64,
    pub error: BatchError,
}

/// The outcome of a batch run. Both lists are sorted by listing id.
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    pub succeeded: Vec<ValuationBreakdown>,
    pub failed: Vec<BatchItemError>,
}

impl BatchResult {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    fn finish(mut self) -> Self {
        self.succeeded.sort_by_key(|b| b.listing_id);
        self.failed.sort_by_key(|f| f.listing_id);
        self
    }
}

// ──────────────────────────────────────────────
// Driver
// ──────────────────────────────────────────────

/// Drives the engine across many listings with bounded parallelism.
pub struct BatchRecalculator {
    config: Arc<ValuationConfig>,
    selector: RulesetSelector,
    max_concurrency: usize,
}

impl BatchRecalculator {
    /// A recalculator sized to available CPU parallelism.
    pub fn new(config: Arc<ValuationConfig>, selector: RulesetSelector) -> Self {
        let max_concurrency = std::thread::available_parallelism().map_or(1, NonZeroUsize::get);
        BatchRecalculator {
            config,
            selector,
            max_concurrency,
        }
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    /// Recalculate a set of already-loaded listings.
    pub async fn recalculate(&self, listings: Vec<ListingSnapshot>) -> BatchResult {
        self.recalculate_with_cancel(listings, &CancelFlag::new())
            .await
    }

    /// Recalculate with a cooperative cancellation handle.
    pub async fn recalculate_with_cancel(
        &self,
        listings: Vec<ListingSnapshot>,
        cancel: &CancelFlag,
    ) -> BatchResult {
        let mut result = BatchResult::default();
        let mut queue = listings.into_iter();

        loop {
            let wave: Vec<ListingSnapshot> =
                queue.by_ref().take(self.max_concurrency).collect();
            if wave.is_empty() {
                break;
            }
            if cancel.is_cancelled() {
                for listing in wave.into_iter().chain(queue.by_ref()) {
                    result.failed.push(BatchItemError {
                        listing_id: listing.id,
                        error: BatchError::Cancelled,
                    });
                }
                break;
            }

            let mut handles = Vec::with_capacity(wave.len());
            for listing in wave {
                let config = Arc::clone(&self.config);
                let selector = self.selector;
                let listing_id = listing.id;
                let handle = tokio::task::spawn_blocking(move || {
                    evaluate_listing(&listing, &config, selector)
                });
                handles.push((listing_id, handle));
            }
            for (listing_id, handle) in handles {
                match handle.await {
                    Ok(Ok(breakdown)) => result.succeeded.push(breakdown),
                    Ok(Err(error)) => result.failed.push(BatchItemError {
                        listing_id,
                        error: BatchError::Eval(error),
                    }),
                    Err(join_error) => result.failed.push(BatchItemError {
                        listing_id,
                        error: BatchError::Panicked {
                            message: join_error.to_string(),
                        },
                    }),
                }
            }
        }

        result.finish()
    }

    /// Fetch listings by id from a provider, then recalculate. A provider
    /// failure for one id fails that id alone.
    pub async fn recalculate_ids(
        &self,
        provider: &dyn ListingProvider,
        ids: &[i64],
    ) -> BatchResult {
        let mut listings = Vec::with_capacity(ids.len());
        let mut result = BatchResult::default();
        for &id in ids {
            match provider.fetch(id).await {
                Ok(listing) => listings.push(listing),
                Err(error) => result.failed.push(BatchItemError {
                    listing_id: id,
                    error: BatchError::Provider(error),
                }),
            }
        }
        let mut computed = self.recalculate(listings).await;
        result.succeeded.append(&mut computed.succeeded);
        result.failed.append(&mut computed.failed);
        result.finish()
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
