use std::future::Future;

use super::{make_record, TestResult};
use crate::canonical::{canonical_json, digest_hex};
use crate::BreakdownStore;

pub(super) async fn run_put_tests<S, F, Fut>(factory: &F, results: &mut Vec<TestResult>)
where
    S: BreakdownStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    results.push(TestResult::new(
        "put",
        "put_then_latest_returns_the_record",
        put_then_latest_returns_the_record(factory).await,
    ));
    results.push(TestResult::new(
        "put",
        "second_put_supersedes_latest",
        second_put_supersedes_latest(factory).await,
    ));
    results.push(TestResult::new(
        "put",
        "put_is_scoped_to_its_listing",
        put_is_scoped_to_its_listing(factory).await,
    ));
    results.push(TestResult::new(
        "put",
        "latest_digest_matches_its_breakdown",
        latest_digest_matches_its_breakdown(factory).await,
    ));
}

// ── Test implementations ──────────────────────────────────────────────────────

/// After one put, latest must return that record.
async fn put_then_latest_returns_the_record<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BreakdownStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let record = make_record(7, 40_000, "2025-08-01T00:00:00Z")?;
    let digest = record.digest.clone();
    s.put(record).await.map_err(|e| e.to_string())?;

    let latest = s
        .latest(7)
        .await
        .map_err(|e| e.to_string())?
        .ok_or("expected a latest record, got None")?;
    if latest.listing_id != 7 {
        return Err(format!("expected listing 7, got {}", latest.listing_id));
    }
    if latest.digest != digest {
        return Err(format!(
            "expected digest {}, got {}",
            digest, latest.digest
        ));
    }
    Ok(())
}

/// A second put for the same listing must replace the latest.
async fn second_put_supersedes_latest<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BreakdownStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let first = make_record(7, 40_000, "2025-08-01T00:00:00Z")?;
    let second = make_record(7, 38_000, "2025-08-02T00:00:00Z")?;
    let second_digest = second.digest.clone();
    if first.digest == second_digest {
        return Err("fixture error: records should differ".to_string());
    }

    s.put(first).await.map_err(|e| e.to_string())?;
    s.put(second).await.map_err(|e| e.to_string())?;

    let latest = s
        .latest(7)
        .await
        .map_err(|e| e.to_string())?
        .ok_or("expected a latest record, got None")?;
    if latest.digest != second_digest {
        return Err(format!(
            "latest should carry the second digest {}, got {}",
            second_digest, latest.digest
        ));
    }
    Ok(())
}

/// A put for one listing must not affect another listing's latest.
async fn put_is_scoped_to_its_listing<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BreakdownStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    s.put(make_record(7, 40_000, "2025-08-01T00:00:00Z")?)
        .await
        .map_err(|e| e.to_string())?;

    let other = s.latest(8).await.map_err(|e| e.to_string())?;
    if other.is_some() {
        return Err("listing 8 should have no latest record".to_string());
    }
    Ok(())
}

/// The stored digest must match a recomputation over the stored payload.
async fn latest_digest_matches_its_breakdown<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: BreakdownStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    s.put(make_record(7, 40_000, "2025-08-01T00:00:00Z")?)
        .await
        .map_err(|e| e.to_string())?;

    let latest = s
        .latest(7)
        .await
        .map_err(|e| e.to_string())?
        .ok_or("expected a latest record, got None")?;
    let recomputed = digest_hex(&canonical_json(&latest.breakdown).map_err(|e| e.to_string())?);
    if latest.digest != recomputed {
        return Err(format!(
            "stored digest {} does not match recomputed {}",
            latest.digest, recomputed
        ));
    }
    Ok(())
}
