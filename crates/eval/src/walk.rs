//! Ruleset walking -- the ordered, sequential pass over groups and rules.
//!
//! Ordering is part of the contract, not an optimization detail: running-
//! total actions read state accumulated by earlier rules, so the walk is
//! sequential and its order fully determined by configuration. Groups walk
//! by `(display_order, id)`; rules within a group by `(evaluation_order,
//! priority, id)`. Sorting happens on index vectors; the snapshot itself is
//! never reordered.

use rust_decimal::Decimal;

use appraise_core::{AttributeMap, RulesetSnapshot};

use crate::error::EvalError;
use crate::record::AdjustmentRecord;
use crate::rule::{evaluate_rule, WalkState};

/// Everything one walk produces.
#[derive(Debug)]
pub struct WalkOutcome {
    /// One record per visited rule, in walk order.
    pub records: Vec<AdjustmentRecord>,
    /// The final running price: base plus every matched delta.
    pub adjusted_price: Decimal,
    /// Sum of matched deltas; equals `adjusted_price - base_price`.
    pub total_adjustment: Decimal,
}

/// Walk a ruleset snapshot against a resolved attribute map.
///
/// Inactive groups are skipped entirely -- their rules never appear in the
/// records. Inactive rules within an active group appear with
/// `matched == false`.
pub fn walk_ruleset(
    snapshot: &RulesetSnapshot,
    base_price: Decimal,
    attributes: &AttributeMap,
) -> Result<WalkOutcome, EvalError> {
    let mut group_order: Vec<usize> = (0..snapshot.groups.len()).collect();
    group_order.sort_by_key(|&i| {
        let group = &snapshot.groups[i];
        (group.display_order, group.id)
    });

    let mut state = WalkState::new(base_price, attributes);
    let mut records = Vec::with_capacity(snapshot.evaluable_rule_count());

    for group_index in group_order {
        let group = &snapshot.groups[group_index];
        if !group.active {
            continue;
        }

        let mut rule_order: Vec<usize> = (0..group.rules.len()).collect();
        rule_order.sort_by_key(|&i| {
            let rule = &group.rules[i];
            (rule.evaluation_order, rule.priority, rule.id)
        });

        for rule_index in rule_order {
            records.push(evaluate_rule(&group.rules[rule_index], group, &mut state)?);
        }
    }

    Ok(WalkOutcome {
        records,
        adjusted_price: state.running_price,
        total_adjustment: state.total_adjustment,
    })
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
