//! Per-rule evaluation records and the trace collector that feeds them.
//!
//! An `AdjustmentRecord` is produced for every rule the walker visits,
//! matched or not. Records are the audit surface of the engine: the
//! breakdown exposes them verbatim so a reader can see which fields a rule
//! touched, what each action computed, and why a contribution degraded to
//! zero.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ──────────────────────────────────────────────
// Warnings
// ──────────────────────────────────────────────

/// A non-fatal attribute problem noticed while evaluating one rule.
///
/// Warnings are trace data, not errors: the evaluation that records one has
/// already degraded (condition false, action contributing zero) and keeps
/// going.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttributeWarning {
    /// A condition or action referenced a field the listing does not carry.
    AbsentField { field: String },
    /// The field is present but not of the type the operator or action
    /// needs. `expected` and `found` are type names (`number`, `text`,
    /// `bool`).
    TypeMismatch {
        field: String,
        expected: String,
        found: String,
    },
}

impl AttributeWarning {
    pub fn absent(field: &str) -> Self {
        AttributeWarning::AbsentField {
            field: field.to_string(),
        }
    }

    pub fn mismatch(field: &str, expected: &str, found: &str) -> Self {
        AttributeWarning::TypeMismatch {
            field: field.to_string(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

// ──────────────────────────────────────────────
// Records
// ──────────────────────────────────────────────

/// What one action computed, in the order actions were configured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionTrace {
    /// The action-type wire token, e.g. `"per_unit_multiplier"`.
    pub action: String,
    /// This action's delta, rounded to cents.
    pub delta: Decimal,
    /// Degradation note when the action contributed zero for a reason
    /// other than its configuration (absent metric, value not in table).
    #[serde(default)]
    pub note: Option<String>,
}

/// The evaluation outcome of a single rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentRecord {
    pub rule_id: i64,
    pub rule_name: String,
    pub group_id: i64,
    pub group_name: String,
    /// The rule's configured active flag. Inactive rules still appear
    /// here, with `matched == false` and no traces.
    pub active: bool,
    pub matched: bool,
    /// Total delta this rule contributed. Zero unless `matched`.
    pub delta: Decimal,
    pub actions: Vec<ActionTrace>,
    /// Every attribute key this rule's condition and actions touched, in
    /// first-touch order, deduplicated.
    pub referenced_fields: Vec<String>,
    pub warnings: Vec<AttributeWarning>,
}

impl AdjustmentRecord {
    /// Whether this record counts as a contributor: matched with a
    /// non-zero delta. A matched rule whose actions net to zero is not a
    /// contributor.
    pub fn contributes(&self) -> bool {
        self.matched && !self.delta.is_zero()
    }
}

// ──────────────────────────────────────────────
// Trace collector
// ──────────────────────────────────────────────

/// Accumulates referenced fields and warnings while one rule evaluates.
///
/// Both lists keep first-touch order and drop duplicates, so the record is
/// readable and deterministic regardless of how often a condition re-reads
/// a field.
#[derive(Debug, Default)]
pub struct RuleTrace {
    fields: Vec<String>,
    warnings: Vec<AttributeWarning>,
}

impl RuleTrace {
    pub fn new() -> Self {
        RuleTrace::default()
    }

    pub fn record_field(&mut self, field: &str) {
        if !self.fields.iter().any(|f| f == field) {
            self.fields.push(field.to_string());
        }
    }

    pub fn record_warning(&mut self, warning: AttributeWarning) {
        if !self.warnings.contains(&warning) {
            self.warnings.push(warning);
        }
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<AttributeWarning>) {
        (self.fields, self.warnings)
    }
}
