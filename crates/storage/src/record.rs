//! Stored record types.
//!
//! Timestamps live on these envelopes, never inside the breakdown value
//! itself -- the breakdown stays byte-identical across re-evaluations of
//! unchanged inputs, and the envelope says when each snapshot was taken.

use serde::{Deserialize, Serialize};

use appraise_eval::ValuationBreakdown;

use crate::canonical::{canonical_json, digest_hex};
use crate::error::StoreError;

/// One stored breakdown snapshot for a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakdownRecord {
    pub listing_id: i64,
    pub ruleset_id: i64,
    pub ruleset_version: String,
    /// ISO 8601 / RFC 3339 timestamp string.
    pub computed_at: String,
    /// Lowercase hex SHA-256 of the breakdown's canonical JSON.
    pub digest: String,
    pub breakdown: ValuationBreakdown,
}

impl BreakdownRecord {
    /// Wrap a breakdown in a storage envelope, canonicalizing and
    /// digesting it. Identity fields are copied out of the breakdown so
    /// backends can index without deserializing the payload.
    pub fn new(
        breakdown: ValuationBreakdown,
        computed_at: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let digest = digest_hex(&canonical_json(&breakdown)?);
        Ok(BreakdownRecord {
            listing_id: breakdown.listing_id,
            ruleset_id: breakdown.ruleset_id,
            ruleset_version: breakdown.ruleset_version.clone(),
            computed_at: computed_at.into(),
            digest,
            breakdown,
        })
    }
}

/// A record of one batch recalculation run, for reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRunRecord {
    pub run_id: String,
    /// The ruleset the batch evaluated against, when one was pinned for
    /// the whole run. `None` for per-listing automatic selection.
    pub ruleset_id: Option<i64>,
    /// ISO 8601 / RFC 3339 timestamp string.
    pub started_at: String,
    /// ISO 8601 / RFC 3339 timestamp string.
    pub finished_at: String,
    pub succeeded: usize,
    pub failed: usize,
}

/// The current wall-clock time as an RFC 3339 string.
pub fn now_rfc3339() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string())
}
