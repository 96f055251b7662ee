use std::future::Future;

use super::{make_batch_run, TestResult};
use crate::BreakdownStore;

pub(super) async fn run_batch_run_tests<S, F, Fut>(factory: &F, results: &mut Vec<TestResult>)
where
    S: BreakdownStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    results.push(TestResult::new(
        "batch_runs",
        "batch_run_round_trips",
        batch_run_round_trips(factory).await,
    ));
    results.push(TestResult::new(
        "batch_runs",
        "batch_runs_are_newest_first",
        batch_runs_are_newest_first(factory).await,
    ));
    results.push(TestResult::new(
        "batch_runs",
        "run_counts_are_preserved",
        run_counts_are_preserved(factory).await,
    ));
}

// ── Test implementations ──────────────────────────────────────────────────────

/// A recorded batch run comes back with every field intact.
async fn batch_run_round_trips<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BreakdownStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let run = make_batch_run("run-a", 12, 1);
    s.record_batch_run(run.clone())
        .await
        .map_err(|e| e.to_string())?;

    let runs = s.batch_runs().await.map_err(|e| e.to_string())?;
    let stored = match runs.as_slice() {
        [only] => only,
        other => return Err(format!("expected exactly 1 run, got {}", other.len())),
    };
    if stored.run_id != run.run_id
        || stored.ruleset_id != run.ruleset_id
        || stored.started_at != run.started_at
        || stored.finished_at != run.finished_at
        || stored.succeeded != run.succeeded
        || stored.failed != run.failed
    {
        return Err(format!("stored run differs: {stored:?}"));
    }
    Ok(())
}

/// Batch runs list most recent first.
async fn batch_runs_are_newest_first<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BreakdownStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    for id in ["run-a", "run-b", "run-c"] {
        s.record_batch_run(make_batch_run(id, 5, 0))
            .await
            .map_err(|e| e.to_string())?;
    }

    let runs = s.batch_runs().await.map_err(|e| e.to_string())?;
    let ids: Vec<&str> = runs.iter().map(|r| r.run_id.as_str()).collect();
    if ids != ["run-c", "run-b", "run-a"] {
        return Err(format!("expected newest first, got {ids:?}"));
    }
    Ok(())
}

/// Success and failure tallies survive storage unchanged.
async fn run_counts_are_preserved<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BreakdownStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    s.record_batch_run(make_batch_run("run-a", 240, 3))
        .await
        .map_err(|e| e.to_string())?;

    let runs = s.batch_runs().await.map_err(|e| e.to_string())?;
    let run = runs.first().ok_or("expected a stored run")?;
    if run.succeeded != 240 || run.failed != 3 {
        return Err(format!(
            "expected 240 succeeded / 3 failed, got {} / {}",
            run.succeeded, run.failed
        ));
    }
    Ok(())
}
