//! Monetary arithmetic helpers.
//!
//! All arithmetic uses `rust_decimal::Decimal` with
//! `RoundingStrategy::MidpointNearestEven`. No `f64` anywhere in the
//! evaluation path. Every helper returns `None` on overflow; callers map
//! that to a typed `NumericOverflow` with the rule id attached.

use rust_decimal::{Decimal, RoundingStrategy};

const CENT_PLACES: u32 = 2;

/// Round a delta to cents with banker's rounding.
pub fn round_to_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CENT_PLACES, RoundingStrategy::MidpointNearestEven)
}

/// percent/100 x basis. Division by the constant 100 cannot overflow.
pub fn percent_of(percent: Decimal, basis: Decimal) -> Option<Decimal> {
    percent
        .checked_div(Decimal::ONE_HUNDRED)?
        .checked_mul(basis)
}

/// rate x units, for per-unit actions.
pub fn units_times_rate(units: Decimal, rate: Decimal) -> Option<Decimal> {
    rate.checked_mul(units)
}

/// basis x (factor - 1), the delta a multiplier applies to a price.
pub fn scale_delta(basis: Decimal, factor: Decimal) -> Option<Decimal> {
    factor.checked_sub(Decimal::ONE)?.checked_mul(basis)
}
