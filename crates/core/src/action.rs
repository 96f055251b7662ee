//! Actions -- the computation steps a matched rule contributes.
//!
//! The action vocabulary is closed: five tagged types, each with fully
//! enumerable semantics. An action never faults at evaluation time; a
//! missing or non-numeric metric degrades to a zero contribution that is
//! noted in the action trace.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One computation step on a rule's ordered action list.
///
/// Wire format is tagged by `"type"`:
///
/// ```json
/// { "type": "per_unit_multiplier", "metric": "ram_capacity_gb", "rate": "-3.125" }
/// { "type": "multiplier_on_running_total", "factor": "0.95" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// delta = -amount. Independent of attributes.
    FixedDeduction { amount: Decimal },
    /// delta = +amount. Independent of attributes.
    FixedPremium { amount: Decimal },
    /// delta = percent/100 x basis price. The basis defaults to the base
    /// price, which keeps percentage rules free of compounding effects.
    PercentOfBase {
        percent: Decimal,
        #[serde(default = "PriceBasis::base")]
        basis: PriceBasis,
    },
    /// delta = rate x the metric's numeric attribute value. Absent or
    /// non-numeric metric: delta = 0, noted in the trace.
    PerUnitMultiplier { metric: String, rate: Decimal },
    /// delta = basis price x (factor - 1). The basis defaults to the running
    /// total, so a 0.95 factor scales everything accumulated so far.
    MultiplierOnRunningTotal {
        factor: FactorSource,
        #[serde(default = "PriceBasis::running")]
        basis: PriceBasis,
    },
}

impl Action {
    /// The wire token for this action type, used in traces.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::FixedDeduction { .. } => "fixed_deduction",
            Action::FixedPremium { .. } => "fixed_premium",
            Action::PercentOfBase { .. } => "percent_of_base",
            Action::PerUnitMultiplier { .. } => "per_unit_multiplier",
            Action::MultiplierOnRunningTotal { .. } => "multiplier_on_running_total",
        }
    }
}

/// Which price a relative action is computed against.
///
/// Configurable per action because the two bases compound differently when
/// several relative rules stack: `base_price` keeps each rule independent,
/// `running_total` makes later rules scale earlier adjustments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceBasis {
    BasePrice,
    RunningTotal,
}

impl PriceBasis {
    pub fn base() -> Self {
        PriceBasis::BasePrice
    }

    pub fn running() -> Self {
        PriceBasis::RunningTotal
    }
}

/// Where a multiplier action finds its factor.
///
/// Untagged: a scalar is a fixed factor; an object is a lookup table keyed
/// by the text value of a metric attribute, e.g.
/// `{"metric": "condition", "table": {"refurbished": "0.95"}}`.
/// A metric value missing from the table degrades to a zero contribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactorSource {
    Fixed(Decimal),
    ByMetric {
        metric: String,
        table: BTreeMap<String, Decimal>,
    },
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
