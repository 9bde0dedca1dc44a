//! Shared helpers for the tax calculators.

use rust_decimal::Decimal;

/// Rounds a currency amount to two decimal places, midpoint away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use fisco_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(1536.004)), dec!(1536.00));
/// assert_eq!(round_half_up(dec!(1536.005)), dec!(1536.01));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Clamps a value at zero. Tax amounts and taxed bases are never negative.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use fisco_core::calculations::common::floor_zero;
///
/// assert_eq!(floor_zero(dec!(-120.50)), dec!(0));
/// assert_eq!(floor_zero(dec!(120.50)), dec!(120.50));
/// ```
pub fn floor_zero(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// Whether a configured rate is outside the sane [0, 1] range. Such rates are
/// still computed, but flagged on the breakdown item.
pub fn is_degenerate_rate(rate: Decimal) -> bool {
    rate < Decimal::ZERO || rate > Decimal::ONE
}
