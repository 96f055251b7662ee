//! Evaluation error type.
//!
//! Deliberately small: almost nothing in the engine can fail. Absent
//! attributes and unmatched conditions are ordinary outcomes recorded in
//! the breakdown, not errors. What remains fatal is a configuration
//! problem, an unresolvable ruleset selection, or decimal overflow.

use std::fmt;

use appraise_core::ConfigError;

/// Errors that can fail a single listing evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// The selected ruleset's configuration is structurally invalid.
    Config(ConfigError),
    /// Ruleset selection did not resolve. `requested` carries the explicit
    /// id that was asked for (override or listing pin), or `None` when no
    /// id was requested and no ruleset is flagged active.
    RulesetNotFound { requested: Option<i64> },
    /// Decimal arithmetic left the representable range.
    NumericOverflow { rule_id: i64, message: String },
}

impl EvalError {
    /// Stable error-kind token. Callers decide retryability from this:
    /// none of these kinds are retry-recoverable without admin action.
    pub fn kind(&self) -> &'static str {
        match self {
            EvalError::Config(_) => "configuration",
            EvalError::RulesetNotFound { .. } => "ruleset_not_found",
            EvalError::NumericOverflow { .. } => "numeric_overflow",
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::Config(err) => {
                write!(f, "configuration error: {}", err)
            }
            EvalError::RulesetNotFound {
                requested: Some(id),
            } => {
                write!(f, "ruleset {} not found in configuration", id)
            }
            EvalError::RulesetNotFound { requested: None } => {
                write!(f, "no ruleset selected: no override and no active ruleset")
            }
            EvalError::NumericOverflow { rule_id, message } => {
                write!(f, "numeric overflow in rule {}: {}", rule_id, message)
            }
        }
    }
}

impl std::error::Error for EvalError {}

impl From<ConfigError> for EvalError {
    fn from(err: ConfigError) -> Self {
        EvalError::Config(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            EvalError::RulesetNotFound { requested: Some(99) }.to_string(),
            "ruleset 99 not found in configuration"
        );
        assert_eq!(
            EvalError::RulesetNotFound { requested: None }.to_string(),
            "no ruleset selected: no override and no active ruleset"
        );
        let err = EvalError::NumericOverflow {
            rule_id: 7,
            message: "running total exceeded the decimal range".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "numeric overflow in rule 7: running total exceeded the decimal range"
        );
    }

    #[test]
    fn config_errors_convert() {
        let err: EvalError = ConfigError::DuplicateRule { id: 4 }.into();
        assert_eq!(err, EvalError::Config(ConfigError::DuplicateRule { id: 4 }));
        assert_eq!(err.kind(), "configuration");
        assert_eq!(err.to_string(), "configuration error: duplicate rule id: 4");
    }

    #[test]
    fn kinds_are_stable() {
        assert_eq!(
            EvalError::RulesetNotFound { requested: None }.kind(),
            "ruleset_not_found"
        );
        assert_eq!(
            EvalError::NumericOverflow {
                rule_id: 1,
                message: String::new(),
            }
            .kind(),
            "numeric_overflow"
        );
    }
}
