//! Structural validation of a configuration snapshot.
//!
//! Runs before any evaluation. Catches the misconfigurations that a closed,
//! typed vocabulary cannot rule out on its own: broken parent links,
//! duplicate ids, operator/operand shape mismatches, and empty metric
//! names. Everything validated here is fatal for an evaluation; absent
//! listing attributes are deliberately NOT an error (they degrade at
//! evaluation time instead).

use std::collections::BTreeSet;

use crate::action::{Action, FactorSource};
use crate::condition::{CompareOp, ConditionExpr, Operand};
use crate::error::ConfigError;
use crate::ruleset::{Rule, RulesetSnapshot, ValuationConfig};
use crate::value::AttrValue;

/// Validate an entire configuration snapshot.
///
/// Checks, in order: ruleset id uniqueness and single-active, group id
/// uniqueness and parent links, rule id uniqueness and parent links, then
/// each rule's condition tree and action list. Returns the first problem
/// found.
pub fn validate_config(config: &ValuationConfig) -> Result<(), ConfigError> {
    let mut ruleset_ids = BTreeSet::new();
    let mut group_ids = BTreeSet::new();
    let mut rule_ids = BTreeSet::new();
    let mut active_ruleset: Option<i64> = None;

    for snapshot in &config.rulesets {
        let ruleset = &snapshot.ruleset;
        if !ruleset_ids.insert(ruleset.id) {
            return Err(ConfigError::DuplicateRuleset { id: ruleset.id });
        }
        if ruleset.active {
            if let Some(first) = active_ruleset {
                return Err(ConfigError::MultipleActiveRulesets {
                    first,
                    second: ruleset.id,
                });
            }
            active_ruleset = Some(ruleset.id);
        }
        validate_groups(snapshot, &mut group_ids, &mut rule_ids)?;
    }

    Ok(())
}

/// Validate one ruleset snapshot in isolation.
///
/// Same per-group and per-rule checks as [`validate_config`], scoped to a
/// single ruleset. Evaluation runs this on the ruleset it selected, so a
/// broken ruleset only fails the listings that resolve to it.
pub fn validate_snapshot(snapshot: &RulesetSnapshot) -> Result<(), ConfigError> {
    let mut group_ids = BTreeSet::new();
    let mut rule_ids = BTreeSet::new();
    validate_groups(snapshot, &mut group_ids, &mut rule_ids)
}

fn validate_groups(
    snapshot: &RulesetSnapshot,
    group_ids: &mut BTreeSet<i64>,
    rule_ids: &mut BTreeSet<i64>,
) -> Result<(), ConfigError> {
    let ruleset = &snapshot.ruleset;
    for group in &snapshot.groups {
        if !group_ids.insert(group.id) {
            return Err(ConfigError::DuplicateGroup { id: group.id });
        }
        if group.ruleset_id != ruleset.id {
            return Err(ConfigError::GroupParentMismatch {
                group_id: group.id,
                expected: ruleset.id,
                found: group.ruleset_id,
            });
        }

        for rule in &group.rules {
            if !rule_ids.insert(rule.id) {
                return Err(ConfigError::DuplicateRule { id: rule.id });
            }
            if rule.group_id != group.id {
                return Err(ConfigError::RuleParentMismatch {
                    rule_id: rule.id,
                    expected: group.id,
                    found: rule.group_id,
                });
            }
            validate_rule(rule)?;
        }
    }
    Ok(())
}

fn validate_rule(rule: &Rule) -> Result<(), ConfigError> {
    validate_condition(rule.id, &rule.condition)?;
    for action in &rule.actions {
        validate_action(rule.id, action)?;
    }
    Ok(())
}

fn validate_condition(rule_id: i64, expr: &ConditionExpr) -> Result<(), ConfigError> {
    match expr {
        ConditionExpr::All { conditions } | ConditionExpr::Any { conditions } => {
            for child in conditions {
                validate_condition(rule_id, child)?;
            }
            Ok(())
        }
        ConditionExpr::Compare { field, op, operand } => {
            if field.is_empty() {
                return Err(ConfigError::EmptyConditionField { rule_id });
            }
            validate_operand(rule_id, *op, operand)
        }
    }
}

/// Enforce operator/operand arity. Shapes that slip past deserialization
/// (an `in_set` with a scalar, an ordering operator with a text operand)
/// are caught here rather than surfacing as silently-false leaves.
fn validate_operand(rule_id: i64, op: CompareOp, operand: &Operand) -> Result<(), ConfigError> {
    let mismatch = |expected: &'static str| ConfigError::OperandMismatch {
        rule_id,
        op: op.token(),
        expected,
        found: operand.shape(),
    };

    match op {
        CompareOp::InSet => match operand {
            Operand::Set(_) => Ok(()),
            _ => Err(mismatch("a set of values")),
        },
        CompareOp::IsNull | CompareOp::IsNotNull => match operand {
            Operand::None => Ok(()),
            _ => Err(mismatch("no operand")),
        },
        CompareOp::GreaterThan
        | CompareOp::LessThan
        | CompareOp::GreaterOrEqual
        | CompareOp::LessOrEqual => match operand {
            Operand::Value(AttrValue::Number(_)) => Ok(()),
            _ => Err(mismatch("a single numeric value")),
        },
        CompareOp::Contains => match operand {
            Operand::Value(AttrValue::Text(_)) => Ok(()),
            _ => Err(mismatch("a single text value")),
        },
        CompareOp::Equals | CompareOp::NotEquals => match operand {
            Operand::Value(_) => Ok(()),
            _ => Err(mismatch("a single value")),
        },
    }
}

fn validate_action(rule_id: i64, action: &Action) -> Result<(), ConfigError> {
    match action {
        Action::PerUnitMultiplier { metric, .. } => {
            if metric.is_empty() {
                return Err(ConfigError::EmptyActionMetric { rule_id });
            }
            Ok(())
        }
        Action::MultiplierOnRunningTotal {
            factor: FactorSource::ByMetric { metric, table },
            ..
        } => {
            if metric.is_empty() {
                return Err(ConfigError::EmptyActionMetric { rule_id });
            }
            if table.is_empty() {
                return Err(ConfigError::EmptyFactorTable { rule_id });
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ruleset::{RuleGroup, Ruleset, RulesetSnapshot};
    use rust_decimal::Decimal;

    fn make_rule(id: i64, group_id: i64, condition: ConditionExpr) -> Rule {
        Rule {
            id,
            group_id,
            name: format!("rule-{}", id),
            description: None,
            evaluation_order: 0,
            priority: 0,
            active: true,
            condition,
            actions: vec![],
        }
    }

    fn make_config(groups: Vec<RuleGroup>) -> ValuationConfig {
        ValuationConfig::new(vec![RulesetSnapshot {
            ruleset: Ruleset {
                id: 1,
                name: "pricing".to_string(),
                version_label: "v1".to_string(),
                active: true,
            },
            groups,
        }])
    }

    fn make_group(id: i64, rules: Vec<Rule>) -> RuleGroup {
        RuleGroup {
            id,
            ruleset_id: 1,
            name: format!("group-{}", id),
            category: "hardware".to_string(),
            display_order: id,
            weight: 0,
            active: true,
            rules,
        }
    }

    #[test]
    fn valid_config_passes() {
        let config = make_config(vec![make_group(
            10,
            vec![make_rule(
                100,
                10,
                ConditionExpr::compare(
                    "manufacturer",
                    CompareOp::Equals,
                    Operand::Value(AttrValue::from("Dell")),
                ),
            )],
        )]);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn duplicate_rule_id_rejected() {
        let config = make_config(vec![make_group(
            10,
            vec![
                make_rule(100, 10, ConditionExpr::always()),
                make_rule(100, 10, ConditionExpr::always()),
            ],
        )]);
        assert_eq!(
            validate_config(&config),
            Err(ConfigError::DuplicateRule { id: 100 })
        );
    }

    #[test]
    fn group_parent_mismatch_rejected() {
        let mut group = make_group(10, vec![]);
        group.ruleset_id = 99;
        let config = make_config(vec![group]);
        assert_eq!(
            validate_config(&config),
            Err(ConfigError::GroupParentMismatch {
                group_id: 10,
                expected: 1,
                found: 99,
            })
        );
    }

    #[test]
    fn rule_parent_mismatch_rejected() {
        let config = make_config(vec![make_group(
            10,
            vec![make_rule(100, 11, ConditionExpr::always())],
        )]);
        assert_eq!(
            validate_config(&config),
            Err(ConfigError::RuleParentMismatch {
                rule_id: 100,
                expected: 10,
                found: 11,
            })
        );
    }

    #[test]
    fn two_active_rulesets_rejected() {
        let snapshot = |id: i64| RulesetSnapshot {
            ruleset: Ruleset {
                id,
                name: format!("rs-{}", id),
                version_label: "v1".to_string(),
                active: true,
            },
            groups: vec![],
        };
        let config = ValuationConfig::new(vec![snapshot(1), snapshot(2)]);
        assert_eq!(
            validate_config(&config),
            Err(ConfigError::MultipleActiveRulesets { first: 1, second: 2 })
        );
    }

    #[test]
    fn in_set_with_scalar_operand_rejected() {
        let config = make_config(vec![make_group(
            10,
            vec![make_rule(
                100,
                10,
                ConditionExpr::compare(
                    "condition",
                    CompareOp::InSet,
                    Operand::Value(AttrValue::from("used")),
                ),
            )],
        )]);
        assert_eq!(
            validate_config(&config),
            Err(ConfigError::OperandMismatch {
                rule_id: 100,
                op: "in_set",
                expected: "a set of values",
                found: "text",
            })
        );
    }

    #[test]
    fn ordering_op_with_text_operand_rejected() {
        let config = make_config(vec![make_group(
            10,
            vec![make_rule(
                100,
                10,
                ConditionExpr::compare(
                    "ram_capacity_gb",
                    CompareOp::GreaterThan,
                    Operand::Value(AttrValue::from("sixteen")),
                ),
            )],
        )]);
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::OperandMismatch { rule_id: 100, .. }));
        assert_eq!(err.rule_id(), Some(100));
    }

    #[test]
    fn is_null_with_operand_rejected() {
        let config = make_config(vec![make_group(
            10,
            vec![make_rule(
                100,
                10,
                ConditionExpr::compare(
                    "gpu.model",
                    CompareOp::IsNull,
                    Operand::Value(AttrValue::from("x")),
                ),
            )],
        )]);
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::OperandMismatch { op: "is_null", .. })
        ));
    }

    #[test]
    fn nested_condition_is_walked() {
        let config = make_config(vec![make_group(
            10,
            vec![make_rule(
                100,
                10,
                ConditionExpr::All {
                    conditions: vec![
                        ConditionExpr::compare(
                            "manufacturer",
                            CompareOp::Equals,
                            Operand::Value(AttrValue::from("Dell")),
                        ),
                        ConditionExpr::Any {
                            conditions: vec![ConditionExpr::compare(
                                "",
                                CompareOp::IsNull,
                                Operand::None,
                            )],
                        },
                    ],
                },
            )],
        )]);
        assert_eq!(
            validate_config(&config),
            Err(ConfigError::EmptyConditionField { rule_id: 100 })
        );
    }

    #[test]
    fn empty_action_metric_rejected() {
        let mut rule = make_rule(100, 10, ConditionExpr::always());
        rule.actions = vec![Action::PerUnitMultiplier {
            metric: String::new(),
            rate: Decimal::from(1),
        }];
        let config = make_config(vec![make_group(10, vec![rule])]);
        assert_eq!(
            validate_config(&config),
            Err(ConfigError::EmptyActionMetric { rule_id: 100 })
        );
    }

    #[test]
    fn snapshot_validation_is_scoped_to_one_ruleset() {
        let healthy = RulesetSnapshot {
            ruleset: Ruleset {
                id: 1,
                name: "pricing".to_string(),
                version_label: "v1".to_string(),
                active: true,
            },
            groups: vec![make_group(10, vec![make_rule(100, 10, ConditionExpr::always())])],
        };
        let mut bad_group = make_group(20, vec![]);
        bad_group.ruleset_id = 2;
        let mut broken_group = make_group(21, vec![]);
        broken_group.ruleset_id = 99;
        let broken = RulesetSnapshot {
            ruleset: Ruleset {
                id: 2,
                name: "draft".to_string(),
                version_label: "v2".to_string(),
                active: false,
            },
            groups: vec![bad_group, broken_group],
        };

        assert!(validate_snapshot(&healthy).is_ok());
        assert!(matches!(
            validate_snapshot(&broken),
            Err(ConfigError::GroupParentMismatch { group_id: 21, .. })
        ));
        // The config as a whole carries the broken ruleset's error.
        let config = ValuationConfig::new(vec![healthy, broken]);
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn empty_factor_table_rejected() {
        let mut rule = make_rule(100, 10, ConditionExpr::always());
        rule.actions = vec![Action::MultiplierOnRunningTotal {
            factor: FactorSource::ByMetric {
                metric: "condition".to_string(),
                table: std::collections::BTreeMap::new(),
            },
            basis: crate::action::PriceBasis::running(),
        }];
        let config = make_config(vec![make_group(10, vec![rule])]);
        assert_eq!(
            validate_config(&config),
            Err(ConfigError::EmptyFactorTable { rule_id: 100 })
        );
    }
}
