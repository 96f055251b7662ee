//! Configuration error type.

/// All structural problems a configuration snapshot can carry.
///
/// Every variant names the offending entity id. Configuration errors are
/// fatal for the evaluation that encounters them and are never silently
/// defaulted around.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Two ruleset snapshots share one id.
    #[error("duplicate ruleset id: {id}")]
    DuplicateRuleset { id: i64 },

    /// Two rule groups share one id.
    #[error("duplicate rule group id: {id}")]
    DuplicateGroup { id: i64 },

    /// Two rules share one id.
    #[error("duplicate rule id: {id}")]
    DuplicateRule { id: i64 },

    /// A group's `ruleset_id` does not name the ruleset that owns it.
    #[error("group {group_id} belongs to ruleset {expected} but references ruleset {found}")]
    GroupParentMismatch {
        group_id: i64,
        expected: i64,
        found: i64,
    },

    /// A rule's `group_id` does not name the group that owns it.
    #[error("rule {rule_id} belongs to group {expected} but references group {found}")]
    RuleParentMismatch {
        rule_id: i64,
        expected: i64,
        found: i64,
    },

    /// More than one ruleset is flagged active.
    #[error("multiple rulesets flagged active: {first} and {second}")]
    MultipleActiveRulesets { first: i64, second: i64 },

    /// A condition leaf has an empty field name.
    #[error("rule {rule_id} has a condition leaf with an empty field name")]
    EmptyConditionField { rule_id: i64 },

    /// A condition leaf's operand shape does not fit its operator.
    #[error("rule {rule_id}: operator '{op}' requires {expected}, got {found}")]
    OperandMismatch {
        rule_id: i64,
        op: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    /// An action reads a metric but its metric name is empty.
    #[error("rule {rule_id} has an action with an empty metric name")]
    EmptyActionMetric { rule_id: i64 },

    /// A multiplier action's factor table is empty.
    #[error("rule {rule_id} has a multiplier action with an empty factor table")]
    EmptyFactorTable { rule_id: i64 },
}

impl ConfigError {
    /// The rule id this error points at, when it points at a rule.
    pub fn rule_id(&self) -> Option<i64> {
        match self {
            ConfigError::DuplicateRule { id } => Some(*id),
            ConfigError::RuleParentMismatch { rule_id, .. }
            | ConfigError::EmptyConditionField { rule_id }
            | ConfigError::OperandMismatch { rule_id, .. }
            | ConfigError::EmptyActionMetric { rule_id }
            | ConfigError::EmptyFactorTable { rule_id } => Some(*rule_id),
            _ => None,
        }
    }
}
