//! The valuation engine entry point.
//!
//! One synchronous, pure call: select a ruleset, validate that snapshot,
//! resolve the listing's attributes, walk, assemble. Configuration is an
//! immutable snapshot for the duration of the call -- nothing is re-read
//! mid-evaluation. Errors are reported, never retried and never silently
//! defaulted around; in particular a listing pinned to a ruleset that no
//! longer exists fails rather than falling back to the active default.

use appraise_core::{validate_snapshot, ConfigError, ListingSnapshot, RulesetSnapshot, ValuationConfig};

use crate::breakdown::ValuationBreakdown;
use crate::error::EvalError;
use crate::resolve::resolve_attributes;
use crate::walk::walk_ruleset;

/// How the engine picks the ruleset for one evaluation.
///
/// Selection is an explicit per-call parameter, never ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RulesetSelector {
    /// Evaluate against this ruleset id, ignoring pins and the default.
    Override(i64),
    /// The listing's `ruleset_override` pin if present, else the single
    /// ruleset flagged active.
    #[default]
    Auto,
}

/// Evaluate one listing against a configuration snapshot.
///
/// Validation is scoped to the selected ruleset, so a structurally broken
/// ruleset only fails the listings that resolve to it.
pub fn evaluate_listing(
    listing: &ListingSnapshot,
    config: &ValuationConfig,
    selector: RulesetSelector,
) -> Result<ValuationBreakdown, EvalError> {
    let snapshot = select_ruleset(config, listing, selector)?;
    validate_snapshot(snapshot)?;
    let attributes = resolve_attributes(listing);
    let outcome = walk_ruleset(snapshot, listing.base_price, &attributes)?;
    Ok(ValuationBreakdown::assemble(
        listing,
        &snapshot.ruleset,
        outcome,
    ))
}

fn select_ruleset<'a>(
    config: &'a ValuationConfig,
    listing: &ListingSnapshot,
    selector: RulesetSelector,
) -> Result<&'a RulesetSnapshot, EvalError> {
    let requested = match selector {
        RulesetSelector::Override(id) => Some(id),
        RulesetSelector::Auto => listing.ruleset_override,
    };
    match requested {
        Some(id) => config.ruleset(id).ok_or(EvalError::RulesetNotFound {
            requested: Some(id),
        }),
        None => {
            let mut actives = config.rulesets.iter().filter(|s| s.ruleset.active);
            let first = actives
                .next()
                .ok_or(EvalError::RulesetNotFound { requested: None })?;
            if let Some(second) = actives.next() {
                return Err(EvalError::Config(ConfigError::MultipleActiveRulesets {
                    first: first.ruleset.id,
                    second: second.ruleset.id,
                }));
            }
            Ok(first)
        }
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
