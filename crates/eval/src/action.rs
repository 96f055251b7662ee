//! Action application -- computing a matched rule's monetary delta.
//!
//! Actions run in configured order and each sees the same context: the
//! listing's base price, the running price accumulated from prior rules,
//! and the attribute map. Running state never advances between the actions
//! of one rule; it advances between rules (see the walker).
//!
//! An action never faults on listing data. Absent or wrongly-typed metrics
//! and table misses degrade to a zero delta with a note in the action
//! trace. The only hard failure is decimal overflow, which is typed, never
//! a panic.

use rust_decimal::Decimal;

use appraise_core::{Action, AttributeMap, FactorSource, PriceBasis};

use crate::error::EvalError;
use crate::money::{percent_of, round_to_cents, scale_delta, units_times_rate};
use crate::record::{ActionTrace, AttributeWarning, RuleTrace};

/// The prices and attributes one rule's actions compute against.
#[derive(Debug, Clone, Copy)]
pub struct ActionContext<'a> {
    pub base_price: Decimal,
    pub running_price: Decimal,
    pub attributes: &'a AttributeMap,
}

impl ActionContext<'_> {
    fn basis(&self, basis: PriceBasis) -> Decimal {
        match basis {
            PriceBasis::BasePrice => self.base_price,
            PriceBasis::RunningTotal => self.running_price,
        }
    }
}

/// Apply a rule's actions, yielding its total delta and per-action traces.
///
/// Each action's delta is rounded to cents (banker's rounding) before it
/// joins the sum, so the rule's total is exactly the sum of the traced
/// deltas.
pub fn apply_actions(
    rule_id: i64,
    actions: &[Action],
    ctx: &ActionContext<'_>,
    trace: &mut RuleTrace,
) -> Result<(Decimal, Vec<ActionTrace>), EvalError> {
    let mut total = Decimal::ZERO;
    let mut traces = Vec::with_capacity(actions.len());

    for (index, action) in actions.iter().enumerate() {
        let computed = compute(action, ctx, trace).ok_or_else(|| EvalError::NumericOverflow {
            rule_id,
            message: format!("action {} ({}) exceeded the decimal range", index, action.kind()),
        })?;
        let (delta, note) = match computed {
            Computed::Value(raw) => (round_to_cents(raw), None),
            Computed::Degraded(note) => (Decimal::ZERO, Some(note)),
        };
        total = total.checked_add(delta).ok_or_else(|| EvalError::NumericOverflow {
            rule_id,
            message: format!(
                "sum of action deltas exceeded the decimal range at action {}",
                index
            ),
        })?;
        traces.push(ActionTrace {
            action: action.kind().to_string(),
            delta,
            note,
        });
    }

    Ok((total, traces))
}

enum Computed {
    Value(Decimal),
    /// Zero contribution with the reason for the trace note.
    Degraded(String),
}

/// One action's raw (unrounded) delta. `None` means overflow.
fn compute(action: &Action, ctx: &ActionContext<'_>, trace: &mut RuleTrace) -> Option<Computed> {
    match action {
        Action::FixedDeduction { amount } => Some(Computed::Value(-*amount)),
        Action::FixedPremium { amount } => Some(Computed::Value(*amount)),
        Action::PercentOfBase { percent, basis } => {
            percent_of(*percent, ctx.basis(*basis)).map(Computed::Value)
        }
        Action::PerUnitMultiplier { metric, rate } => {
            trace.record_field(metric);
            match ctx.attributes.get(metric) {
                None => {
                    trace.record_warning(AttributeWarning::absent(metric));
                    Some(Computed::Degraded(format!(
                        "metric '{}' absent; contributed 0",
                        metric
                    )))
                }
                Some(value) => match value.as_number() {
                    Some(units) => units_times_rate(units, *rate).map(Computed::Value),
                    None => {
                        trace.record_warning(AttributeWarning::mismatch(
                            metric,
                            "number",
                            value.type_name(),
                        ));
                        Some(Computed::Degraded(format!(
                            "metric '{}' is {}, not a number; contributed 0",
                            metric,
                            value.type_name()
                        )))
                    }
                },
            }
        }
        Action::MultiplierOnRunningTotal { factor, basis } => {
            let factor = match resolve_factor(factor, ctx.attributes, trace) {
                Ok(f) => f,
                Err(note) => return Some(Computed::Degraded(note)),
            };
            scale_delta(ctx.basis(*basis), factor).map(Computed::Value)
        }
    }
}

/// Resolve a multiplier's factor. `Err` carries the degradation note.
fn resolve_factor(
    factor: &FactorSource,
    attributes: &AttributeMap,
    trace: &mut RuleTrace,
) -> Result<Decimal, String> {
    match factor {
        FactorSource::Fixed(f) => Ok(*f),
        FactorSource::ByMetric { metric, table } => {
            trace.record_field(metric);
            let Some(value) = attributes.get(metric) else {
                trace.record_warning(AttributeWarning::absent(metric));
                return Err(format!("metric '{}' absent; contributed 0", metric));
            };
            let Some(key) = value.as_text() else {
                trace.record_warning(AttributeWarning::mismatch(
                    metric,
                    "text",
                    value.type_name(),
                ));
                return Err(format!(
                    "metric '{}' is {}, not text; contributed 0",
                    metric,
                    value.type_name()
                ));
            };
            match table.get(key) {
                Some(f) => Ok(*f),
                None => Err(format!(
                    "value '{}' not in factor table; contributed 0",
                    key
                )),
            }
        }
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
