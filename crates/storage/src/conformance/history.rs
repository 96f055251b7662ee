use std::future::Future;

use super::{make_record, TestResult};
use crate::BreakdownStore;

pub(super) async fn run_history_tests<S, F, Fut>(factory: &F, results: &mut Vec<TestResult>)
where
    S: BreakdownStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    results.push(TestResult::new(
        "history",
        "history_is_newest_first",
        history_is_newest_first(factory).await,
    ));
    results.push(TestResult::new(
        "history",
        "history_is_append_only",
        history_is_append_only(factory).await,
    ));
    results.push(TestResult::new(
        "history",
        "histories_are_independent_per_listing",
        histories_are_independent_per_listing(factory).await,
    ));
    results.push(TestResult::new(
        "history",
        "superseded_records_remain_readable",
        superseded_records_remain_readable(factory).await,
    ));
}

// ── Test implementations ──────────────────────────────────────────────────────

/// History must list the most recent put first.
async fn history_is_newest_first<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BreakdownStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    for (cents, when) in [
        (40_000, "2025-08-01T00:00:00Z"),
        (38_000, "2025-08-02T00:00:00Z"),
        (41_500, "2025-08-03T00:00:00Z"),
    ] {
        s.put(make_record(7, cents, when)?)
            .await
            .map_err(|e| e.to_string())?;
    }

    let history = s.history(7).await.map_err(|e| e.to_string())?;
    let stamps: Vec<&str> = history.iter().map(|r| r.computed_at.as_str()).collect();
    let expected = [
        "2025-08-03T00:00:00Z",
        "2025-08-02T00:00:00Z",
        "2025-08-01T00:00:00Z",
    ];
    if stamps != expected {
        return Err(format!("expected {expected:?}, got {stamps:?}"));
    }
    Ok(())
}

/// Superseding must grow history, never rewrite it in place.
async fn history_is_append_only<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BreakdownStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    s.put(make_record(7, 40_000, "2025-08-01T00:00:00Z")?)
        .await
        .map_err(|e| e.to_string())?;
    let before = s.history(7).await.map_err(|e| e.to_string())?.len();

    s.put(make_record(7, 38_000, "2025-08-02T00:00:00Z")?)
        .await
        .map_err(|e| e.to_string())?;
    let after = s.history(7).await.map_err(|e| e.to_string())?.len();

    if before != 1 || after != 2 {
        return Err(format!(
            "expected history to grow 1 -> 2, got {before} -> {after}"
        ));
    }
    Ok(())
}

/// One listing's history must not leak into another's.
async fn histories_are_independent_per_listing<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BreakdownStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    s.put(make_record(7, 40_000, "2025-08-01T00:00:00Z")?)
        .await
        .map_err(|e| e.to_string())?;
    s.put(make_record(7, 38_000, "2025-08-02T00:00:00Z")?)
        .await
        .map_err(|e| e.to_string())?;
    s.put(make_record(8, 99_000, "2025-08-02T00:00:00Z")?)
        .await
        .map_err(|e| e.to_string())?;

    let seven = s.history(7).await.map_err(|e| e.to_string())?;
    let eight = s.history(8).await.map_err(|e| e.to_string())?;
    if seven.len() != 2 {
        return Err(format!("expected 2 records for listing 7, got {}", seven.len()));
    }
    if eight.len() != 1 {
        return Err(format!("expected 1 record for listing 8, got {}", eight.len()));
    }
    if seven.iter().any(|r| r.listing_id != 7) || eight.iter().any(|r| r.listing_id != 8) {
        return Err("history returned a record for the wrong listing".to_string());
    }
    Ok(())
}

/// A superseded record must stay readable with its payload intact.
async fn superseded_records_remain_readable<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BreakdownStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let first = make_record(7, 40_000, "2025-08-01T00:00:00Z")?;
    let first_digest = first.digest.clone();
    s.put(first).await.map_err(|e| e.to_string())?;
    s.put(make_record(7, 38_000, "2025-08-02T00:00:00Z")?)
        .await
        .map_err(|e| e.to_string())?;

    let history = s.history(7).await.map_err(|e| e.to_string())?;
    let superseded = history
        .iter()
        .find(|r| r.digest == first_digest)
        .ok_or("superseded record missing from history")?;
    if superseded.computed_at != "2025-08-01T00:00:00Z" {
        return Err(format!(
            "superseded record lost its timestamp: {}",
            superseded.computed_at
        ));
    }
    Ok(())
}
