//! Condition expressions -- the boolean trees that gate rules.
//!
//! Conditions are admin-authored JSON. The vocabulary is closed: a fixed
//! operator set over flat attribute keys, combined with `all`/`any` nodes.
//! There is no scripting, no recursion beyond tree nesting, and no implicit
//! type coercion anywhere in their semantics.

use serde::{Deserialize, Serialize};

use crate::value::AttrValue;

/// A node in a condition expression tree.
///
/// Wire format is tagged by `"type"`:
///
/// ```json
/// { "type": "all", "conditions": [
///     { "type": "compare", "field": "manufacturer", "op": "equals", "operand": "Dell" },
///     { "type": "compare", "field": "ram_capacity_gb", "op": "greater_or_equal", "operand": 16 }
/// ]}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConditionExpr {
    /// Logical AND over child conditions. Short-circuits on the first false
    /// child. An empty list is vacuously true (authors use it as an
    /// explicit always-match).
    All { conditions: Vec<ConditionExpr> },
    /// Logical OR over child conditions. Short-circuits on the first true
    /// child. An empty list is false.
    Any { conditions: Vec<ConditionExpr> },
    /// Leaf comparison of one attribute against an operand.
    Compare {
        field: String,
        op: CompareOp,
        #[serde(default)]
        operand: Operand,
    },
}

impl ConditionExpr {
    /// Leaf shorthand used throughout tests and fixtures.
    pub fn compare(field: impl Into<String>, op: CompareOp, operand: Operand) -> Self {
        ConditionExpr::Compare {
            field: field.into(),
            op,
            operand,
        }
    }

    /// An always-true condition (empty `all` node).
    pub fn always() -> Self {
        ConditionExpr::All { conditions: vec![] }
    }
}

/// The closed comparison operator set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
    InSet,
    Contains,
    IsNull,
    IsNotNull,
}

impl CompareOp {
    /// The wire token, also used in validation errors and traces.
    pub fn token(&self) -> &'static str {
        match self {
            CompareOp::Equals => "equals",
            CompareOp::NotEquals => "not_equals",
            CompareOp::GreaterThan => "greater_than",
            CompareOp::LessThan => "less_than",
            CompareOp::GreaterOrEqual => "greater_or_equal",
            CompareOp::LessOrEqual => "less_or_equal",
            CompareOp::InSet => "in_set",
            CompareOp::Contains => "contains",
            CompareOp::IsNull => "is_null",
            CompareOp::IsNotNull => "is_not_null",
        }
    }
}

/// The right-hand side of a leaf comparison.
///
/// Untagged: a JSON array is a `Set` (for `in_set`), a scalar is a `Value`,
/// and `null` or an omitted field is `None` (for `is_null`/`is_not_null`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Operand {
    Set(Vec<AttrValue>),
    Value(AttrValue),
    None,
}

impl Default for Operand {
    fn default() -> Self {
        Operand::None
    }
}

impl Operand {
    /// Human-readable shape name, used in validation errors.
    pub fn shape(&self) -> &'static str {
        match self {
            Operand::Set(_) => "set",
            Operand::Value(v) => v.type_name(),
            Operand::None => "none",
        }
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn compare_op_round_trip() {
        for (op, token) in [
            (CompareOp::Equals, "\"equals\""),
            (CompareOp::NotEquals, "\"not_equals\""),
            (CompareOp::GreaterOrEqual, "\"greater_or_equal\""),
            (CompareOp::InSet, "\"in_set\""),
            (CompareOp::IsNull, "\"is_null\""),
        ] {
            assert_eq!(serde_json::to_string(&op).unwrap(), token);
            let back: CompareOp = serde_json::from_str(token).unwrap();
            assert_eq!(back, op);
        }
    }

    #[test]
    fn deserializes_nested_tree() {
        let json = serde_json::json!({
            "type": "all",
            "conditions": [
                {"type": "compare", "field": "manufacturer", "op": "equals", "operand": "Dell"},
                {"type": "any", "conditions": [
                    {"type": "compare", "field": "condition", "op": "in_set",
                     "operand": ["used", "refurbished"]},
                    {"type": "compare", "field": "gpu.model", "op": "is_null"}
                ]}
            ]
        });
        let expr: ConditionExpr = serde_json::from_value(json).unwrap();
        match expr {
            ConditionExpr::All { conditions } => {
                assert_eq!(conditions.len(), 2);
                match &conditions[1] {
                    ConditionExpr::Any { conditions } => {
                        assert!(matches!(
                            conditions[0],
                            ConditionExpr::Compare {
                                op: CompareOp::InSet,
                                operand: Operand::Set(_),
                                ..
                            }
                        ));
                        assert!(matches!(
                            conditions[1],
                            ConditionExpr::Compare {
                                op: CompareOp::IsNull,
                                operand: Operand::None,
                                ..
                            }
                        ));
                    }
                    other => panic!("expected any node, got {:?}", other),
                }
            }
            other => panic!("expected all node, got {:?}", other),
        }
    }

    #[test]
    fn numeric_operand_parses_as_number() {
        let json = serde_json::json!(
            {"type": "compare", "field": "ram_capacity_gb", "op": "greater_than", "operand": 8}
        );
        let expr: ConditionExpr = serde_json::from_value(json).unwrap();
        match expr {
            ConditionExpr::Compare { operand, .. } => {
                assert_eq!(operand, Operand::Value(AttrValue::Number(Decimal::from(8))));
            }
            other => panic!("expected compare leaf, got {:?}", other),
        }
    }

    #[test]
    fn missing_operand_defaults_to_none() {
        let json = serde_json::json!(
            {"type": "compare", "field": "gpu.model", "op": "is_not_null"}
        );
        let expr: ConditionExpr = serde_json::from_value(json).unwrap();
        match expr {
            ConditionExpr::Compare { operand, .. } => assert_eq!(operand, Operand::None),
            other => panic!("expected compare leaf, got {:?}", other),
        }
    }

    #[test]
    fn always_is_empty_all() {
        assert_eq!(
            ConditionExpr::always(),
            ConditionExpr::All { conditions: vec![] }
        );
    }
}
