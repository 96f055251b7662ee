//! Appraise valuation engine -- deterministic, explainable price
//! adjustment for product listings.
//!
//! Given a listing snapshot and an admin-authored rule configuration, the
//! engine computes an adjusted price and a complete breakdown of every
//! rule it visited: matched or not, what each action contributed, which
//! attributes were read, and how degradations were handled. Evaluation is
//! pure and synchronous; the optional `batch` feature adds a driver that
//! runs many listings on blocking threads with per-listing isolation.

pub mod action;
#[cfg(feature = "batch")]
pub mod batch;
pub mod breakdown;
pub mod condition;
pub mod engine;
pub mod error;
pub mod money;
pub mod provider;
pub mod record;
pub mod resolve;
pub mod rule;
pub mod walk;

pub use action::{apply_actions, ActionContext};
#[cfg(feature = "batch")]
pub use batch::{BatchError, BatchItemError, BatchRecalculator, BatchResult, CancelFlag};
pub use breakdown::{BreakdownView, ValuationBreakdown};
pub use condition::eval_condition;
pub use engine::{evaluate_listing, RulesetSelector};
pub use error::EvalError;
pub use provider::{ListingProvider, ProviderError, StaticListingProvider};
pub use record::{ActionTrace, AdjustmentRecord, AttributeWarning, RuleTrace};
pub use resolve::resolve_attributes;
pub use rule::{evaluate_rule, WalkState};
pub use walk::{walk_ruleset, WalkOutcome};

// ──────────────────────────────────────────────
// End-to-end tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod integration_tests {
    use super::*;
    use appraise_core::{
        Action, AttrValue, CompareOp, ConditionExpr, FactorSource, ListingSnapshot, Operand,
        PriceBasis, RamSpec, Rule, RuleGroup, Ruleset, RulesetSnapshot, ValuationConfig,
    };
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_rule(
        id: i64,
        group_id: i64,
        name: &str,
        evaluation_order: i64,
        condition: ConditionExpr,
        actions: Vec<Action>,
    ) -> Rule {
        Rule {
            id,
            group_id,
            name: name.to_string(),
            description: None,
            evaluation_order,
            priority: 0,
            active: true,
            condition,
            actions,
        }
    }

    /// A ruleset exercising every action type and both inactivity shapes:
    ///
    /// - Memory group: per-unit RAM deduction.
    /// - Condition group: refurbished running-total multiplier, a
    ///   manufacturer premium, an always-matched rule whose metric is
    ///   usually absent, and a retired (inactive) rule.
    /// - A whole inactive Legacy group whose rule must never appear.
    fn pricing_config() -> ValuationConfig {
        let ram_deduction = make_rule(
            100,
            10,
            "RAM deduction",
            1,
            ConditionExpr::compare("ram_capacity_gb", CompareOp::IsNotNull, Operand::None),
            vec![Action::PerUnitMultiplier {
                metric: "ram_capacity_gb".to_string(),
                rate: dec("-3.125"),
            }],
        );
        let refurbished = make_rule(
            200,
            20,
            "Refurbished multiplier",
            1,
            ConditionExpr::compare(
                "condition",
                CompareOp::Equals,
                Operand::Value(AttrValue::from("refurbished")),
            ),
            vec![Action::MultiplierOnRunningTotal {
                factor: FactorSource::Fixed(dec("0.95")),
                basis: PriceBasis::running(),
            }],
        );
        let dell_premium = make_rule(
            201,
            20,
            "Dell premium",
            2,
            ConditionExpr::compare(
                "manufacturer",
                CompareOp::Equals,
                Operand::Value(AttrValue::from("Dell")),
            ),
            vec![Action::FixedPremium { amount: dec("15.00") }],
        );
        let gpu_bonus = make_rule(
            202,
            20,
            "GPU VRAM bonus",
            3,
            ConditionExpr::always(),
            vec![Action::PerUnitMultiplier {
                metric: "gpu.vram_gb".to_string(),
                rate: dec("2.50"),
            }],
        );
        let mut retired = make_rule(
            203,
            20,
            "Retired deduction",
            4,
            ConditionExpr::always(),
            vec![Action::FixedDeduction { amount: dec("99.00") }],
        );
        retired.active = false;

        let legacy_rule = make_rule(
            300,
            30,
            "Legacy flat deduction",
            1,
            ConditionExpr::always(),
            vec![Action::FixedDeduction { amount: dec("500.00") }],
        );

        ValuationConfig::new(vec![RulesetSnapshot {
            ruleset: Ruleset {
                id: 1,
                name: "2025 desktop pricing".to_string(),
                version_label: "2025.1".to_string(),
                active: true,
            },
            groups: vec![
                RuleGroup {
                    id: 10,
                    ruleset_id: 1,
                    name: "Memory".to_string(),
                    category: "hardware".to_string(),
                    display_order: 1,
                    weight: 0,
                    active: true,
                    rules: vec![ram_deduction],
                },
                RuleGroup {
                    id: 20,
                    ruleset_id: 1,
                    name: "Condition".to_string(),
                    category: "condition".to_string(),
                    display_order: 2,
                    weight: 0,
                    active: true,
                    rules: vec![refurbished, dell_premium, gpu_bonus, retired],
                },
                RuleGroup {
                    id: 30,
                    ruleset_id: 1,
                    name: "Legacy".to_string(),
                    category: "legacy".to_string(),
                    display_order: 3,
                    weight: 0,
                    active: false,
                    rules: vec![legacy_rule],
                },
            ],
        }])
    }

    fn refurbished_listing() -> ListingSnapshot {
        let mut listing = ListingSnapshot::new(7, dec("450.00"));
        listing.condition = Some("refurbished".to_string());
        listing.manufacturer = Some("Intel".to_string());
        listing.ram = Some(RamSpec {
            capacity_gb: 16,
            ddr_generation: Some("ddr4".to_string()),
        });
        listing
    }

    fn evaluate(listing: &ListingSnapshot) -> ValuationBreakdown {
        evaluate_listing(listing, &pricing_config(), RulesetSelector::Auto).unwrap()
    }

    #[test]
    fn per_unit_ram_deduction_end_to_end() {
        // 16 GB x -3.125 = -50.00 from a 450.00 base.
        let breakdown = evaluate(&refurbished_listing());
        let ram = &breakdown.records[0];
        assert_eq!(ram.rule_name, "RAM deduction");
        assert!(ram.matched);
        assert_eq!(ram.delta, dec("-50.00"));
        assert_eq!(ram.actions.len(), 1);
        assert_eq!(ram.actions[0].action, "per_unit_multiplier");
    }

    #[test]
    fn refurbished_multiplier_compounds_on_running_price() {
        // Applied after the RAM deduction: 400 x (0.95 - 1) = -20.00,
        // not 450 x (0.95 - 1).
        let breakdown = evaluate(&refurbished_listing());
        let refurbished = &breakdown.records[1];
        assert_eq!(refurbished.rule_name, "Refurbished multiplier");
        assert_eq!(refurbished.delta, dec("-20.00"));
        assert_eq!(breakdown.adjusted_price, dec("380.00"));
        assert_eq!(breakdown.total_adjustment, dec("-70.00"));
    }

    #[test]
    fn unmatched_rule_is_listed_inactive() {
        // manufacturer is "Intel"; the Dell premium must not fire but must
        // still appear.
        let breakdown = evaluate(&refurbished_listing());
        let dell = breakdown
            .records
            .iter()
            .find(|r| r.rule_name == "Dell premium")
            .unwrap();
        assert!(dell.active);
        assert!(!dell.matched);
        assert_eq!(dell.delta, Decimal::ZERO);
        assert_eq!(dell.referenced_fields, vec!["manufacturer"]);

        let view = breakdown.partition();
        assert!(view.inactive.iter().any(|r| r.rule_name == "Dell premium"));
    }

    #[test]
    fn matched_zero_delta_is_not_a_contributor() {
        // The GPU bonus matches (always-true condition) but its metric is
        // absent, so it nets zero and lands in the inactive tier.
        let breakdown = evaluate(&refurbished_listing());
        let gpu = breakdown
            .records
            .iter()
            .find(|r| r.rule_name == "GPU VRAM bonus")
            .unwrap();
        assert!(gpu.matched);
        assert_eq!(gpu.delta, Decimal::ZERO);
        assert_eq!(gpu.warnings, vec![AttributeWarning::absent("gpu.vram_gb")]);
        assert!(gpu.actions[0].note.is_some());

        assert_eq!(breakdown.matched_rules_count, 2);
        let view = breakdown.partition();
        assert!(view.inactive.iter().any(|r| r.rule_name == "GPU VRAM bonus"));
    }

    #[test]
    fn override_to_unknown_ruleset_errors() {
        let err = evaluate_listing(
            &refurbished_listing(),
            &pricing_config(),
            RulesetSelector::Override(99),
        )
        .unwrap_err();
        assert_eq!(err, EvalError::RulesetNotFound { requested: Some(99) });
        assert_eq!(err.kind(), "ruleset_not_found");
    }

    #[test]
    fn identical_inputs_identical_bytes() {
        let listing = refurbished_listing();
        let config = pricing_config();
        let first = evaluate_listing(&listing, &config, RulesetSelector::Auto).unwrap();
        let second = evaluate_listing(&listing, &config, RulesetSelector::Auto).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn breakdown_covers_every_active_group_rule() {
        let config = pricing_config();
        let breakdown =
            evaluate_listing(&refurbished_listing(), &config, RulesetSelector::Auto).unwrap();
        // Four rules in the Condition group plus one in Memory; the Legacy
        // group is inactive and contributes no records at all.
        assert_eq!(breakdown.records.len(), 5);
        assert_eq!(
            breakdown.records.len(),
            config.rulesets[0].evaluable_rule_count()
        );
        assert!(breakdown.records.iter().all(|r| r.rule_id != 300));
        // The retired rule appears, unmatched.
        let retired = breakdown
            .records
            .iter()
            .find(|r| r.rule_id == 203)
            .unwrap();
        assert!(!retired.active);
        assert!(!retired.matched);
    }

    #[test]
    fn partition_and_sort_hold_end_to_end() {
        let breakdown = evaluate(&refurbished_listing());
        let view = breakdown.partition();

        assert_eq!(
            view.contributors.len() + view.inactive.len(),
            breakdown.records.len()
        );
        for contributor in &view.contributors {
            assert!(contributor.matched);
            assert!(!contributor.delta.is_zero());
        }
        for pair in view.contributors.windows(2) {
            assert!(pair[0].delta.abs() >= pair[1].delta.abs());
        }
        let inactive_names: Vec<&str> =
            view.inactive.iter().map(|r| r.rule_name.as_str()).collect();
        let mut sorted = inactive_names.clone();
        sorted.sort_unstable();
        assert_eq!(inactive_names, sorted);

        // Impact ranking: the -50 RAM deduction outranks the -20 multiplier.
        assert_eq!(view.contributors[0].rule_name, "RAM deduction");
        assert_eq!(view.contributors[1].rule_name, "Refurbished multiplier");
    }

    #[test]
    fn adjusted_price_closes_arithmetically() {
        let breakdown = evaluate(&refurbished_listing());
        let matched_sum: Decimal = breakdown
            .records
            .iter()
            .filter(|r| r.matched)
            .map(|r| r.delta)
            .sum();
        assert_eq!(breakdown.adjusted_price, breakdown.base_price + matched_sum);
        assert_eq!(breakdown.total_adjustment, matched_sum);
    }

    #[test]
    fn absent_fields_never_error() {
        // A bare listing with no components: conditions on absent fields
        // evaluate unmatched, actions on absent metrics contribute zero,
        // and the evaluation still succeeds.
        let bare = ListingSnapshot::new(8, dec("450.00"));
        let breakdown =
            evaluate_listing(&bare, &pricing_config(), RulesetSelector::Auto).unwrap();
        assert_eq!(breakdown.adjusted_price, dec("450.00"));
        assert_eq!(breakdown.matched_rules_count, 0);
        let ram = &breakdown.records[0];
        assert!(!ram.matched);
        assert!(breakdown
            .records
            .iter()
            .all(|r| !r.matched || r.delta.is_zero()));
    }

    #[test]
    fn admin_json_config_drives_the_engine() {
        let json = serde_json::json!({
            "rulesets": [{
                "ruleset": {
                    "id": 1,
                    "name": "2025 desktop pricing",
                    "version_label": "2025.1",
                    "active": true
                },
                "groups": [{
                    "id": 10,
                    "ruleset_id": 1,
                    "name": "Condition",
                    "category": "condition",
                    "display_order": 1,
                    "weight": 0,
                    "active": true,
                    "rules": [{
                        "id": 100,
                        "group_id": 10,
                        "name": "Secondary market deduction",
                        "evaluation_order": 1,
                        "priority": 0,
                        "active": true,
                        "condition": {
                            "type": "compare",
                            "field": "condition",
                            "op": "in_set",
                            "operand": ["used", "refurbished"]
                        },
                        "actions": [
                            {"type": "percent_of_base", "percent": "-10"}
                        ]
                    }]
                }]
            }]
        });
        let config: ValuationConfig = serde_json::from_value(json).unwrap();
        let mut listing = ListingSnapshot::new(12, dec("450.00"));
        listing.condition = Some("used".to_string());
        let breakdown = evaluate_listing(&listing, &config, RulesetSelector::Auto).unwrap();
        assert_eq!(breakdown.adjusted_price, dec("405.00"));
        assert_eq!(breakdown.matched_rules_count, 1);
        assert_eq!(breakdown.records[0].actions[0].delta, dec("-45.00"));
    }
}
