//! Ruleset, rule group, and rule configuration entities.
//!
//! These are long-lived entities authored by administrators and loaded by
//! the caller into an immutable snapshot per evaluation call. The engine
//! never re-reads configuration mid-evaluation, so there is no torn-read
//! window and no hidden global "active ruleset" state.

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::condition::ConditionExpr;

/// A named, versioned collection of rule groups.
///
/// Exactly one ruleset is flagged active at a time; a listing may pin an
/// explicit override instead. Edits create a new evaluation, never a
/// mutation of persisted history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ruleset {
    pub id: i64,
    pub name: String,
    pub version_label: String,
    pub active: bool,
}

/// An ordered, categorized container of rules within a ruleset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleGroup {
    pub id: i64,
    pub ruleset_id: i64,
    pub name: String,
    /// Category label for presentation grouping, e.g. `"hardware"`.
    pub category: String,
    /// Walk order among groups; ties broken by group id ascending.
    pub display_order: i64,
    /// Informational only. Never used in arithmetic.
    pub weight: i64,
    pub active: bool,
    pub rules: Vec<Rule>,
}

/// A condition + actions unit. If the condition matches, the actions
/// compute this rule's price delta.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    pub id: i64,
    pub group_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Walk order within the group; ties broken by `priority`, then id.
    pub evaluation_order: i64,
    pub priority: i64,
    pub active: bool,
    pub condition: ConditionExpr,
    pub actions: Vec<Action>,
}

/// One ruleset with its fully loaded groups -- the unit of selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesetSnapshot {
    pub ruleset: Ruleset,
    pub groups: Vec<RuleGroup>,
}

impl RulesetSnapshot {
    /// Count of rules that a breakdown of this snapshot will contain:
    /// every rule in an active group, whether or not the rule is active.
    pub fn evaluable_rule_count(&self) -> usize {
        self.groups
            .iter()
            .filter(|g| g.active)
            .map(|g| g.rules.len())
            .sum()
    }
}

/// Everything the engine may select a ruleset from in one evaluation call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValuationConfig {
    pub rulesets: Vec<RulesetSnapshot>,
}

impl ValuationConfig {
    pub fn new(rulesets: Vec<RulesetSnapshot>) -> Self {
        ValuationConfig { rulesets }
    }

    /// Find a ruleset snapshot by id.
    pub fn ruleset(&self, id: i64) -> Option<&RulesetSnapshot> {
        self.rulesets.iter().find(|s| s.ruleset.id == id)
    }

    /// The single ruleset flagged active, if any. Uniqueness is enforced by
    /// validation, not here.
    pub fn default_active(&self) -> Option<&RulesetSnapshot> {
        self.rulesets.iter().find(|s| s.ruleset.active)
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
