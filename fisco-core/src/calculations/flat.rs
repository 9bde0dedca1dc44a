//! Flat rate calculator.
//!
//! Handles the single-rate taxes: `base * rate`, or
//! `base * presumption_rate * rate` when a presumed-profit percentage applies
//! (Lucro Presumido IRPJ/CSLL, where e.g. 4.8% is charged on 32% of gross
//! revenue rather than on gross revenue itself). No bracket lookup, no
//! deduction term.

use rust_decimal::Decimal;
use tracing::warn;

use crate::calculations::common::{floor_zero, is_degenerate_rate, round_half_up};

/// Outcome of one flat computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatOutcome {
    pub amount: Decimal,
    /// The base the rate was actually applied to, after presumption.
    pub effective_base: Decimal,
    /// The rate (or presumption rate) fell outside [0, 1].
    pub degenerate_rate: bool,
}

/// Computes `base * rate`, or `base * presumption_rate * rate` when a
/// presumption percentage is supplied. The amount is rounded half-up and
/// floored at zero.
pub fn compute_flat(
    base: Decimal,
    rate: Decimal,
    presumption_rate: Option<Decimal>,
) -> FlatOutcome {
    let degenerate_rate = is_degenerate_rate(rate)
        || presumption_rate.map(is_degenerate_rate).unwrap_or(false);
    if degenerate_rate {
        warn!(
            rate = %rate,
            presumption_rate = ?presumption_rate,
            "flat rate outside [0, 1]; computing anyway"
        );
    }

    let effective_base = match presumption_rate {
        Some(presumption) => base * presumption,
        None => base,
    };
    let amount = floor_zero(round_half_up(effective_base * rate));

    FlatOutcome {
        amount,
        effective_base,
        degenerate_rate,
    }
}
