//! Configuration model for the appraise valuation engine.
//!
//! Holds the admin-authored pricing vocabulary (rulesets, groups, rules,
//! conditions, actions), the listing snapshot the caller supplies, typed
//! attribute values, and structural validation. No evaluation logic lives
//! here -- this crate only defines WHAT a configuration is and whether it
//! is well-formed.

pub mod action;
pub mod condition;
pub mod error;
pub mod listing;
pub mod ruleset;
pub mod validate;
pub mod value;

pub use action::{Action, FactorSource, PriceBasis};
pub use condition::{CompareOp, ConditionExpr, Operand};
pub use error::ConfigError;
pub use listing::{CpuSpec, GpuSpec, ListingSnapshot, RamSpec, StorageSpec};
pub use ruleset::{Rule, RuleGroup, Ruleset, RulesetSnapshot, ValuationConfig};
pub use validate::{validate_config, validate_snapshot};
pub use value::{AttrValue, AttributeMap};
