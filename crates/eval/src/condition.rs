//! Condition evaluation against a resolved attribute map.
//!
//! A total function: conditions never error and never panic. Anything
//! surprising (absent field, type mismatch) evaluates to `false` and leaves
//! a warning in the trace. The only asymmetry is `is_null`, which is `true`
//! on absence.
//!
//! Comparison is strict same-type only. There is no string/number coercion:
//! `equals` across types is simply unequal, ordering and `contains` on the
//! wrong type are `false` with a `TypeMismatch` warning.

use appraise_core::{AttrValue, AttributeMap, CompareOp, ConditionExpr, Operand};

use crate::record::{AttributeWarning, RuleTrace};

/// Evaluate a condition tree. `all` short-circuits on the first false
/// child, `any` on the first true child; an empty `all` is true, an empty
/// `any` is false. Fields touched by evaluated leaves are recorded in the
/// trace; leaves skipped by short-circuiting are not touched.
pub fn eval_condition(expr: &ConditionExpr, attributes: &AttributeMap, trace: &mut RuleTrace) -> bool {
    match expr {
        ConditionExpr::All { conditions } => conditions
            .iter()
            .all(|child| eval_condition(child, attributes, trace)),
        ConditionExpr::Any { conditions } => conditions
            .iter()
            .any(|child| eval_condition(child, attributes, trace)),
        ConditionExpr::Compare { field, op, operand } => {
            eval_leaf(field, *op, operand, attributes, trace)
        }
    }
}

fn eval_leaf(
    field: &str,
    op: CompareOp,
    operand: &Operand,
    attributes: &AttributeMap,
    trace: &mut RuleTrace,
) -> bool {
    trace.record_field(field);
    let value = attributes.get(field);

    // Presence operators look only at absence, never at the value.
    match op {
        CompareOp::IsNull => return value.is_none(),
        CompareOp::IsNotNull => return value.is_some(),
        _ => {}
    }

    let Some(value) = value else {
        trace.record_warning(AttributeWarning::absent(field));
        return false;
    };

    match op {
        CompareOp::Equals => match operand {
            Operand::Value(rhs) => value == rhs,
            _ => false,
        },
        CompareOp::NotEquals => match operand {
            Operand::Value(rhs) => value != rhs,
            _ => false,
        },
        CompareOp::GreaterThan
        | CompareOp::LessThan
        | CompareOp::GreaterOrEqual
        | CompareOp::LessOrEqual => eval_ordering(field, op, value, operand, trace),
        CompareOp::InSet => match operand {
            Operand::Set(candidates) => candidates.iter().any(|candidate| candidate == value),
            _ => false,
        },
        CompareOp::Contains => eval_contains(field, value, operand, trace),
        // Handled above.
        CompareOp::IsNull | CompareOp::IsNotNull => false,
    }
}

fn eval_ordering(
    field: &str,
    op: CompareOp,
    value: &AttrValue,
    operand: &Operand,
    trace: &mut RuleTrace,
) -> bool {
    let rhs = match operand {
        Operand::Value(AttrValue::Number(n)) => *n,
        _ => return false,
    };
    let Some(lhs) = value.as_number() else {
        trace.record_warning(AttributeWarning::mismatch(field, "number", value.type_name()));
        return false;
    };
    match op {
        CompareOp::GreaterThan => lhs > rhs,
        CompareOp::LessThan => lhs < rhs,
        CompareOp::GreaterOrEqual => lhs >= rhs,
        CompareOp::LessOrEqual => lhs <= rhs,
        _ => false,
    }
}

fn eval_contains(field: &str, value: &AttrValue, operand: &Operand, trace: &mut RuleTrace) -> bool {
    let needle = match operand {
        Operand::Value(AttrValue::Text(t)) => t,
        _ => return false,
    };
    match value.as_text() {
        Some(haystack) => haystack.contains(needle.as_str()),
        None => {
            trace.record_warning(AttributeWarning::mismatch(field, "text", value.type_name()));
            false
        }
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
