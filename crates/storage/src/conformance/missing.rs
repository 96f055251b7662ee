use std::future::Future;

use super::{make_record, TestResult};
use crate::BreakdownStore;

pub(super) async fn run_missing_tests<S, F, Fut>(factory: &F, results: &mut Vec<TestResult>)
where
    S: BreakdownStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    results.push(TestResult::new(
        "missing",
        "latest_of_unknown_listing_is_none",
        latest_of_unknown_listing_is_none(factory).await,
    ));
    results.push(TestResult::new(
        "missing",
        "history_of_unknown_listing_is_empty",
        history_of_unknown_listing_is_empty(factory).await,
    ));
    results.push(TestResult::new(
        "missing",
        "batch_runs_start_empty",
        batch_runs_start_empty(factory).await,
    ));
}

// ── Test implementations ──────────────────────────────────────────────────────

/// An unknown listing is Ok(None), not an error.
async fn latest_of_unknown_listing_is_none<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BreakdownStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    s.put(make_record(7, 40_000, "2025-08-01T00:00:00Z")?)
        .await
        .map_err(|e| e.to_string())?;

    match s.latest(999).await.map_err(|e| e.to_string())? {
        None => Ok(()),
        Some(r) => Err(format!(
            "unknown listing returned a record for listing {}",
            r.listing_id
        )),
    }
}

/// An unknown listing has an empty history, not an error.
async fn history_of_unknown_listing_is_empty<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BreakdownStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let history = s.history(999).await.map_err(|e| e.to_string())?;
    if !history.is_empty() {
        return Err(format!(
            "expected empty history, got {} records",
            history.len()
        ));
    }
    Ok(())
}

/// A fresh store has no batch runs.
async fn batch_runs_start_empty<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BreakdownStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let runs = s.batch_runs().await.map_err(|e| e.to_string())?;
    if !runs.is_empty() {
        return Err(format!("expected no batch runs, got {}", runs.len()));
    }
    Ok(())
}
