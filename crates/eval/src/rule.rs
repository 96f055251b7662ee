//! Single-rule evaluation.
//!
//! Every visited rule yields an `AdjustmentRecord`, matched or not. An
//! inactive rule short-circuits to an empty record; an unmatched rule keeps
//! its condition's trace; a matched rule runs its actions and advances the
//! walk's running state.

use rust_decimal::Decimal;

use appraise_core::{AttributeMap, Rule, RuleGroup};

use crate::action::{apply_actions, ActionContext};
use crate::condition::eval_condition;
use crate::error::EvalError;
use crate::record::{AdjustmentRecord, RuleTrace};

/// Mutable state threaded through one ruleset walk.
#[derive(Debug)]
pub struct WalkState<'a> {
    pub base_price: Decimal,
    /// Base price plus every matched delta applied so far.
    pub running_price: Decimal,
    /// Checked sum of matched deltas; `running_price - base_price` by
    /// construction.
    pub total_adjustment: Decimal,
    pub attributes: &'a AttributeMap,
}

impl<'a> WalkState<'a> {
    pub fn new(base_price: Decimal, attributes: &'a AttributeMap) -> Self {
        WalkState {
            base_price,
            running_price: base_price,
            total_adjustment: Decimal::ZERO,
            attributes,
        }
    }

    fn advance(&mut self, rule_id: i64, delta: Decimal) -> Result<(), EvalError> {
        let overflow = || EvalError::NumericOverflow {
            rule_id,
            message: "running total exceeded the decimal range".to_string(),
        };
        self.running_price = self.running_price.checked_add(delta).ok_or_else(overflow)?;
        self.total_adjustment = self.total_adjustment.checked_add(delta).ok_or_else(overflow)?;
        Ok(())
    }
}

/// Evaluate one rule within its group, updating the walk state on a match.
pub fn evaluate_rule(
    rule: &Rule,
    group: &RuleGroup,
    state: &mut WalkState<'_>,
) -> Result<AdjustmentRecord, EvalError> {
    let base = |matched| AdjustmentRecord {
        rule_id: rule.id,
        rule_name: rule.name.clone(),
        group_id: group.id,
        group_name: group.name.clone(),
        active: rule.active,
        matched,
        delta: Decimal::ZERO,
        actions: vec![],
        referenced_fields: vec![],
        warnings: vec![],
    };

    if !rule.active {
        return Ok(base(false));
    }

    let mut trace = RuleTrace::new();
    if !eval_condition(&rule.condition, state.attributes, &mut trace) {
        let (referenced_fields, warnings) = trace.into_parts();
        let mut record = base(false);
        record.referenced_fields = referenced_fields;
        record.warnings = warnings;
        return Ok(record);
    }

    let ctx = ActionContext {
        base_price: state.base_price,
        running_price: state.running_price,
        attributes: state.attributes,
    };
    let (delta, actions) = apply_actions(rule.id, &rule.actions, &ctx, &mut trace)?;
    state.advance(rule.id, delta)?;

    let (referenced_fields, warnings) = trace.into_parts();
    let mut record = base(true);
    record.delta = delta;
    record.actions = actions;
    record.referenced_fields = referenced_fields;
    record.warnings = warnings;
    Ok(record)
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
