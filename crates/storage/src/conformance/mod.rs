//! Conformance test suite for `BreakdownStore` implementations.
//!
//! This module provides a backend-agnostic test suite that any
//! `BreakdownStore` implementation can run to verify correctness. The
//! suite covers:
//!
//! - **Put / latest**: a put record becomes the listing's latest snapshot
//! - **History**: newest-first ordering, append-only supersede semantics
//! - **Idempotency**: re-putting the latest digest adds nothing
//! - **Missing listings**: unknown ids yield `None` / empty, never errors
//! - **Batch runs**: run records round-trip and list newest first
//!
//! # Usage
//!
//! Backend crates call [`run_conformance_suite`] with a factory function
//! that creates a fresh, empty store for each test:
//!
//! ```ignore
//! use appraise_storage::conformance::run_conformance_suite;
//!
//! #[tokio::test]
//! async fn postgres_conformance() {
//!     let report = run_conformance_suite(|| async {
//!         create_test_postgres_store().await
//!     }).await;
//!     assert!(report.is_clean(), "{report}");
//! }
//! ```

mod history;
mod idempotent;
mod missing;
mod put;
mod runs;

use std::fmt;
use std::future::Future;

use rust_decimal::Decimal;

use appraise_eval::{ActionTrace, AdjustmentRecord, ValuationBreakdown};

use crate::record::{BatchRunRecord, BreakdownRecord};
use crate::BreakdownStore;

/// The outcome of one conformance test.
#[derive(Debug, Clone)]
pub struct TestResult {
    /// Test category (e.g. "put", "history").
    pub category: &'static str,
    /// Test name within the category.
    pub name: &'static str,
    /// `Err` carries the failure message.
    pub outcome: Result<(), String>,
}

impl TestResult {
    fn new(category: &'static str, name: &'static str, outcome: Result<(), String>) -> Self {
        TestResult {
            category,
            name,
            outcome,
        }
    }

    pub fn passed(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Every test outcome from one suite run.
#[derive(Debug, Clone, Default)]
pub struct ConformanceReport {
    pub results: Vec<TestResult>,
}

impl ConformanceReport {
    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.passed()
    }

    /// True when every test passed.
    pub fn is_clean(&self) -> bool {
        self.failed() == 0
    }
}

impl fmt::Display for ConformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} conformance tests passed",
            self.passed(),
            self.total()
        )?;
        for result in &self.results {
            if let Err(message) = &result.outcome {
                write!(f, "\n  {}::{} failed: {}", result.category, result.name, message)?;
            }
        }
        Ok(())
    }
}

/// Run the full conformance suite against a storage backend.
///
/// The `factory` is invoked once per test, so every test starts from a
/// fresh, empty store.
pub async fn run_conformance_suite<S, F, Fut>(factory: F) -> ConformanceReport
where
    S: BreakdownStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let mut report = ConformanceReport::default();

    put::run_put_tests(&factory, &mut report.results).await;
    history::run_history_tests(&factory, &mut report.results).await;
    idempotent::run_idempotency_tests(&factory, &mut report.results).await;
    missing::run_missing_tests(&factory, &mut report.results).await;
    runs::run_batch_run_tests(&factory, &mut report.results).await;

    report
}

// ── Helpers: breakdown and batch-run fixtures ─────────────────────────────────

/// A realistic breakdown fixture. `adjusted_cents` varies the payload so
/// different fixtures carry different digests.
fn make_breakdown(listing_id: i64, adjusted_cents: i64) -> ValuationBreakdown {
    let base = Decimal::new(45_000, 2);
    let adjusted = Decimal::new(adjusted_cents, 2);
    let delta = adjusted - base;
    ValuationBreakdown {
        listing_id,
        base_price: base,
        adjusted_price: adjusted,
        total_adjustment: delta,
        ruleset_id: 1,
        ruleset_name: "conformance pricing".to_string(),
        ruleset_version: "v1".to_string(),
        matched_rules_count: usize::from(!delta.is_zero()),
        records: vec![AdjustmentRecord {
            rule_id: 100,
            rule_name: "RAM deduction".to_string(),
            group_id: 10,
            group_name: "Memory".to_string(),
            active: true,
            matched: !delta.is_zero(),
            delta,
            actions: vec![ActionTrace {
                action: "per_unit_multiplier".to_string(),
                delta,
                note: None,
            }],
            referenced_fields: vec!["ram_capacity_gb".to_string()],
            warnings: vec![],
        }],
    }
}

fn make_record(
    listing_id: i64,
    adjusted_cents: i64,
    computed_at: &str,
) -> Result<BreakdownRecord, String> {
    BreakdownRecord::new(make_breakdown(listing_id, adjusted_cents), computed_at)
        .map_err(|e| e.to_string())
}

fn make_batch_run(run_id: &str, succeeded: usize, failed: usize) -> BatchRunRecord {
    BatchRunRecord {
        run_id: run_id.to_string(),
        ruleset_id: Some(1),
        started_at: "2025-08-01T00:00:00Z".to_string(),
        finished_at: "2025-08-01T00:00:09Z".to_string(),
        succeeded,
        failed,
    }
}
