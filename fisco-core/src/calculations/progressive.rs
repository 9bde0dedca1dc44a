//! Progressive bracket calculator.
//!
//! A progressive configuration is an ordered table of brackets covering
//! `[0, ∞)` with no gaps or overlaps: each bracket's `min_value` (inclusive)
//! equals the previous bracket's `max_value` (exclusive), and only the top
//! bracket is unbounded. The tax for a base is single-bracket:
//! `base * rate - deduction`, floored at zero; the deduction term already
//! encodes the lower brackets' relief.

use rust_decimal::Decimal;
use tracing::warn;

use crate::calculations::common::{floor_zero, is_degenerate_rate, round_half_up};
use crate::calculations::error::CalculationError;
use crate::models::{TaxRateBracket, TaxRateConfiguration};

/// Outcome of one progressive computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressiveOutcome {
    pub amount: Decimal,
    /// Rate of the matched bracket.
    pub rate: Decimal,
    pub deduction: Decimal,
    pub bracket_order: u32,
    /// The matched bracket's rate fell outside [0, 1].
    pub degenerate_rate: bool,
}

/// Validates the contiguity/coverage invariant of a configuration's bracket
/// table.
///
/// Tables are user-editable, so every computation re-checks them even though
/// a well-formed store never hands out an invalid table.
///
/// # Errors
///
/// [`CalculationError::EmptyBrackets`] for an empty table, and
/// [`CalculationError::InvalidBrackets`] naming the offending bracket order
/// when ordering, contiguity, or top-bracket coverage is violated.
pub fn validate_brackets(config: &TaxRateConfiguration) -> Result<(), CalculationError> {
    let brackets = &config.brackets;
    if brackets.is_empty() {
        return Err(CalculationError::EmptyBrackets {
            regime: config.regime,
            tax_type: config.tax_type,
        });
    }

    let invalid = |order: u32, reason: &str| CalculationError::InvalidBrackets {
        regime: config.regime,
        tax_type: config.tax_type,
        order,
        reason: reason.to_string(),
    };

    let first = &brackets[0];
    if first.min_value != Decimal::ZERO {
        return Err(invalid(first.order, "first bracket must start at 0"));
    }

    for (index, bracket) in brackets.iter().enumerate() {
        let expected_order = (index + 1) as u32;
        if bracket.order != expected_order {
            return Err(invalid(bracket.order, "bracket orders must be contiguous from 1"));
        }

        let is_last = index == brackets.len() - 1;
        match (bracket.max_value, is_last) {
            (None, false) => {
                return Err(invalid(bracket.order, "only the top bracket may be unbounded"));
            }
            (Some(_), true) => {
                return Err(invalid(bracket.order, "top bracket must be unbounded"));
            }
            (Some(max), false) => {
                if max <= bracket.min_value {
                    return Err(invalid(bracket.order, "max_value must exceed min_value"));
                }
                let next = &brackets[index + 1];
                if next.min_value != max {
                    return Err(invalid(
                        next.order,
                        "brackets must be contiguous: min_value must equal the previous max_value",
                    ));
                }
            }
            (None, true) => {}
        }

        if bracket.deduction < Decimal::ZERO {
            return Err(invalid(bracket.order, "deduction must not be negative"));
        }
    }

    Ok(())
}

/// Computes the tax for `base` against a validated bracket table.
///
/// The unique match is the bracket with `min_value <= base` and either no
/// `max_value` or `base < max_value`; a base of zero lands in the first
/// bracket. The amount is `max(0, base * rate - deduction)`, rounded half-up.
///
/// # Errors
///
/// Propagates [`validate_brackets`] failures, plus
/// [`CalculationError::NoMatchingBracket`] should the (already validated)
/// table somehow not cover `base`.
pub fn compute_progressive(
    base: Decimal,
    config: &TaxRateConfiguration,
) -> Result<ProgressiveOutcome, CalculationError> {
    validate_brackets(config)?;

    let bracket = find_bracket(base, &config.brackets).ok_or(
        CalculationError::NoMatchingBracket {
            regime: config.regime,
            tax_type: config.tax_type,
            base,
        },
    )?;

    let degenerate_rate = is_degenerate_rate(bracket.rate);
    if degenerate_rate {
        warn!(
            regime = %config.regime,
            tax_type = %config.tax_type,
            order = bracket.order,
            rate = %bracket.rate,
            "bracket rate outside [0, 1]; computing anyway"
        );
    }

    let amount = floor_zero(round_half_up(base * bracket.rate - bracket.deduction));

    Ok(ProgressiveOutcome {
        amount,
        rate: bracket.rate,
        deduction: bracket.deduction,
        bracket_order: bracket.order,
        degenerate_rate,
    })
}

fn find_bracket(base: Decimal, brackets: &[TaxRateBracket]) -> Option<&TaxRateBracket> {
    brackets.iter().find(|b| {
        base >= b.min_value && b.max_value.map(|max| base < max).unwrap_or(true)
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use crate::models::{TaxRegime, TaxType};

    use super::*;

    fn bracket(
        order: u32,
        min: Decimal,
        max: Option<Decimal>,
        rate: Decimal,
        deduction: Decimal,
    ) -> TaxRateBracket {
        TaxRateBracket {
            order,
            min_value: min,
            max_value: max,
            rate,
            deduction,
        }
    }

    /// The annual IRPF table: exempt up to 60 000, then 15% and 27.5% tiers.
    fn irpf_annual_config() -> TaxRateConfiguration {
        TaxRateConfiguration::progressive(
            "clinic-1",
            TaxRegime::PfCarneLeao,
            TaxType::Irpf,
            vec![
                bracket(1, dec!(0), Some(dec!(60000)), dec!(0), dec!(0)),
                bracket(2, dec!(60000), Some(dec!(88200)), dec!(0.15), dec!(9000)),
                bracket(3, dec!(88200), None, dec!(0.275), dec!(10904.76)),
            ],
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        )
    }

    #[test]
    fn zero_base_lands_in_first_bracket_and_owes_nothing() {
        let outcome = compute_progressive(dec!(0), &irpf_annual_config()).unwrap();

        assert_eq!(outcome.bracket_order, 1);
        assert_eq!(outcome.amount, dec!(0));
    }

    #[test]
    fn exempt_tier_owes_nothing() {
        let outcome = compute_progressive(dec!(59999.99), &irpf_annual_config()).unwrap();

        assert_eq!(outcome.bracket_order, 1);
        assert_eq!(outcome.amount, dec!(0));
    }

    #[test]
    fn min_value_is_inclusive_max_value_exclusive() {
        let at_boundary = compute_progressive(dec!(60000), &irpf_annual_config()).unwrap();
        assert_eq!(at_boundary.bracket_order, 2);

        let at_top_boundary = compute_progressive(dec!(88200), &irpf_annual_config()).unwrap();
        assert_eq!(at_top_boundary.bracket_order, 3);
    }

    #[test]
    fn middle_tier_applies_rate_minus_deduction() {
        // 80000 * 0.15 - 9000 = 3000
        let outcome = compute_progressive(dec!(80000), &irpf_annual_config()).unwrap();

        assert_eq!(outcome.bracket_order, 2);
        assert_eq!(outcome.amount, dec!(3000.00));
    }

    #[test]
    fn top_tier_is_unbounded() {
        // 100000 * 0.275 - 10904.76 = 16595.24
        let outcome = compute_progressive(dec!(100000), &irpf_annual_config()).unwrap();

        assert_eq!(outcome.bracket_order, 3);
        assert_eq!(outcome.amount, dec!(16595.24));
    }

    #[test]
    fn amount_is_floored_at_zero() {
        // Right at the tier start the deduction can exceed base*rate.
        // 60000 * 0.15 - 9000 = 0; a hair above stays non-negative too.
        let outcome = compute_progressive(dec!(60000), &irpf_annual_config()).unwrap();
        assert_eq!(outcome.amount, dec!(0.00));
    }

    #[test]
    fn monotone_in_base() {
        let config = irpf_annual_config();
        let bases = [
            dec!(0),
            dec!(30000),
            dec!(59999.99),
            dec!(60000),
            dec!(75000),
            dec!(88200),
            dec!(120000),
            dec!(500000),
        ];

        let mut previous = dec!(-1);
        for base in bases {
            let amount = compute_progressive(base, &config).unwrap().amount;
            assert!(
                amount >= previous,
                "tax decreased from {previous} to {amount} at base {base}"
            );
            previous = amount;
        }
    }

    #[test]
    fn empty_table_is_a_configuration_error() {
        let config = TaxRateConfiguration::progressive(
            "clinic-1",
            TaxRegime::PfCarneLeao,
            TaxType::Irpf,
            Vec::new(),
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        );

        assert_eq!(
            compute_progressive(dec!(100), &config),
            Err(CalculationError::EmptyBrackets {
                regime: TaxRegime::PfCarneLeao,
                tax_type: TaxType::Irpf,
            })
        );
    }

    #[test]
    fn gap_between_brackets_is_rejected() {
        let mut config = irpf_annual_config();
        config.brackets[1].min_value = dec!(60001); // leaves [60000, 60001) uncovered

        let result = compute_progressive(dec!(100), &config);

        assert!(matches!(
            result,
            Err(CalculationError::InvalidBrackets { order: 2, .. })
        ));
    }

    #[test]
    fn overlap_between_brackets_is_rejected() {
        let mut config = irpf_annual_config();
        config.brackets[1].min_value = dec!(59000);

        assert!(matches!(
            compute_progressive(dec!(100), &config),
            Err(CalculationError::InvalidBrackets { order: 2, .. })
        ));
    }

    #[test]
    fn bounded_top_bracket_is_rejected() {
        let mut config = irpf_annual_config();
        config.brackets[2].max_value = Some(dec!(1000000));

        assert!(matches!(
            compute_progressive(dec!(100), &config),
            Err(CalculationError::InvalidBrackets { order: 3, .. })
        ));
    }

    #[test]
    fn unbounded_middle_bracket_is_rejected() {
        let mut config = irpf_annual_config();
        config.brackets[1].max_value = None;

        assert!(matches!(
            compute_progressive(dec!(100), &config),
            Err(CalculationError::InvalidBrackets { order: 2, .. })
        ));
    }

    #[test]
    fn non_contiguous_orders_are_rejected() {
        let mut config = irpf_annual_config();
        config.brackets[2].order = 5;

        assert!(matches!(
            compute_progressive(dec!(100), &config),
            Err(CalculationError::InvalidBrackets { order: 5, .. })
        ));
    }

    #[test]
    fn first_bracket_must_start_at_zero() {
        let mut config = irpf_annual_config();
        config.brackets[0].min_value = dec!(1);

        assert!(matches!(
            compute_progressive(dec!(100), &config),
            Err(CalculationError::InvalidBrackets { order: 1, .. })
        ));
    }

    #[test]
    fn degenerate_rate_is_flagged_but_computed() {
        let mut config = irpf_annual_config();
        config.brackets[2].rate = dec!(1.5);

        let outcome = compute_progressive(dec!(100000), &config).unwrap();

        assert!(outcome.degenerate_rate);
        // 100000 * 1.5 - 10904.76
        assert_eq!(outcome.amount, dec!(139095.24));
    }
}
