//! The valuation breakdown -- the engine's complete output artifact.
//!
//! A breakdown is a point-in-time value: superseded by re-evaluation, never
//! mutated. It carries every visited rule's record in walk order; the
//! contributor/inactive presentation split is a derived view computed on
//! demand, not stored.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use appraise_core::{ListingSnapshot, Ruleset};

use crate::record::AdjustmentRecord;
use crate::walk::WalkOutcome;

/// The complete, explainable result of evaluating one listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationBreakdown {
    pub listing_id: i64,
    pub base_price: Decimal,
    pub adjusted_price: Decimal,
    /// `adjusted_price - base_price`; the sum of matched deltas.
    pub total_adjustment: Decimal,
    pub ruleset_id: i64,
    pub ruleset_name: String,
    pub ruleset_version: String,
    /// Count of records with `matched == true` and a non-zero delta.
    pub matched_rules_count: usize,
    /// Every visited rule, in walk order -- not just contributors.
    pub records: Vec<AdjustmentRecord>,
}

impl ValuationBreakdown {
    pub(crate) fn assemble(
        listing: &ListingSnapshot,
        ruleset: &Ruleset,
        outcome: WalkOutcome,
    ) -> Self {
        let matched_rules_count = outcome.records.iter().filter(|r| r.contributes()).count();
        ValuationBreakdown {
            listing_id: listing.id,
            base_price: listing.base_price,
            adjusted_price: outcome.adjusted_price,
            total_adjustment: outcome.total_adjustment,
            ruleset_id: ruleset.id,
            ruleset_name: ruleset.name.clone(),
            ruleset_version: ruleset.version_label.clone(),
            matched_rules_count,
            records: outcome.records,
        }
    }

    /// Split records into the display-ready two-tier view.
    pub fn partition(&self) -> BreakdownView {
        let mut contributors: Vec<AdjustmentRecord> = Vec::new();
        let mut inactive: Vec<AdjustmentRecord> = Vec::new();
        for record in &self.records {
            if record.contributes() {
                contributors.push(record.clone());
            } else {
                inactive.push(record.clone());
            }
        }
        contributors.sort_by(|a, b| {
            b.delta
                .abs()
                .cmp(&a.delta.abs())
                .then_with(|| a.rule_name.cmp(&b.rule_name))
        });
        inactive.sort_by(|a, b| a.rule_name.cmp(&b.rule_name));
        BreakdownView {
            contributors,
            inactive,
        }
    }
}

/// The two-tier presentation split of a breakdown's records.
///
/// Contributors are ranked by impact (`|delta|` descending, ties by rule
/// name ascending) for quick scanning; inactive rules are ranked by rule
/// name for lookup -- they have no impact to rank by. Together the two
/// lists partition the full record list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownView {
    pub contributors: Vec<AdjustmentRecord>,
    pub inactive: Vec<AdjustmentRecord>,
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
