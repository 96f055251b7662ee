use std::future::Future;

use super::{make_record, TestResult};
use crate::BreakdownStore;

pub(super) async fn run_idempotency_tests<S, F, Fut>(factory: &F, results: &mut Vec<TestResult>)
where
    S: BreakdownStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    results.push(TestResult::new(
        "idempotency",
        "re_put_of_latest_digest_is_a_no_op",
        re_put_of_latest_digest_is_a_no_op(factory).await,
    ));
    results.push(TestResult::new(
        "idempotency",
        "re_put_does_not_disturb_latest",
        re_put_does_not_disturb_latest(factory).await,
    ));
    results.push(TestResult::new(
        "idempotency",
        "older_digest_supersedes_again",
        older_digest_supersedes_again(factory).await,
    ));
}

// ── Test implementations ──────────────────────────────────────────────────────

/// Re-putting the digest already at the head must not grow history.
async fn re_put_of_latest_digest_is_a_no_op<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BreakdownStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    s.put(make_record(7, 40_000, "2025-08-01T00:00:00Z")?)
        .await
        .map_err(|e| e.to_string())?;
    // Same breakdown recomputed later: identical digest, fresh timestamp.
    s.put(make_record(7, 40_000, "2025-08-02T00:00:00Z")?)
        .await
        .map_err(|e| e.to_string())?;

    let history = s.history(7).await.map_err(|e| e.to_string())?;
    if history.len() != 1 {
        return Err(format!(
            "expected 1 record after idempotent re-put, got {}",
            history.len()
        ));
    }
    Ok(())
}

/// An idempotent re-put must leave the original record untouched.
async fn re_put_does_not_disturb_latest<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BreakdownStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    s.put(make_record(7, 40_000, "2025-08-01T00:00:00Z")?)
        .await
        .map_err(|e| e.to_string())?;
    s.put(make_record(7, 40_000, "2025-08-02T00:00:00Z")?)
        .await
        .map_err(|e| e.to_string())?;

    let latest = s
        .latest(7)
        .await
        .map_err(|e| e.to_string())?
        .ok_or("expected a latest record, got None")?;
    if latest.computed_at != "2025-08-01T00:00:00Z" {
        return Err(format!(
            "idempotent re-put should keep the original timestamp, got {}",
            latest.computed_at
        ));
    }
    Ok(())
}

/// A digest seen earlier but no longer at the head is a real supersede.
async fn older_digest_supersedes_again<S, F, Fut>(factory: &F) -> Result<(), String>
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
    // The 40_000 breakdown comes back, e.g. after a ruleset rollback.
    let returned = make_record(7, 40_000, "2025-08-03T00:00:00Z")?;
    let returned_digest = returned.digest.clone();
    s.put(returned).await.map_err(|e| e.to_string())?;

    let history = s.history(7).await.map_err(|e| e.to_string())?;
    if history.len() != 3 {
        return Err(format!(
            "a returning digest must append, expected 3 records, got {}",
            history.len()
        ));
    }
    let latest = s
        .latest(7)
        .await
        .map_err(|e| e.to_string())?
        .ok_or("expected a latest record, got None")?;
    if latest.digest != returned_digest || latest.computed_at != "2025-08-03T00:00:00Z" {
        return Err("the returning record should be the new head".to_string());
    }
    Ok(())
}
