use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{TaxRegime, TaxType};

/// One computed tax line inside a regime's breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdownItem {
    pub tax_type: TaxType,
    pub tax_label: String,
    /// The base the rate was applied to (after presumption/cap/excess rules).
    pub base_value: Decimal,
    /// The applied rate, or the effective rate for progressive items.
    pub rate: Decimal,
    /// Human-readable rate, e.g. `"15,00%"` or `"Progressivo"`.
    pub rate_display: String,
    pub calculated_amount: Decimal,
    pub notes: Option<String>,
}

/// Per-month detail emitted by the monthly IRPF and DAS paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyTaxBreakdown {
    pub month: u32,
    pub month_name: String,
    pub base_value: Decimal,
    pub tax_amount: Decimal,
    pub effective_rate: Decimal,
    /// Order of the bracket the month landed in, when progressive.
    pub bracket_order: Option<u32>,
}

/// One regime's full outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxCalculationResult {
    pub regime: TaxRegime,
    pub regime_label: String,
    /// The regime's taxed base (e.g. income net of deductible expenses for
    /// Carnê-Leão, gross revenue for Simples).
    pub base_value: Decimal,
    pub taxes: Vec<TaxBreakdownItem>,
    pub total_taxes: Decimal,
    /// `total_taxes` over the side's gross income, so rates are comparable
    /// across regimes. 0 when gross income is 0.
    pub effective_rate: Decimal,
    /// Populated only by the monthly calculation paths.
    pub monthly_breakdown: Vec<MonthlyTaxBreakdown>,
}

impl TaxCalculationResult {
    /// Sums the breakdown and derives the effective rate against
    /// `gross_income`.
    pub(crate) fn from_items(
        regime: TaxRegime,
        base_value: Decimal,
        gross_income: Decimal,
        taxes: Vec<TaxBreakdownItem>,
        monthly_breakdown: Vec<MonthlyTaxBreakdown>,
    ) -> Self {
        let total_taxes: Decimal = taxes.iter().map(|t| t.calculated_amount).sum();
        let effective_rate = if gross_income > Decimal::ZERO {
            total_taxes / gross_income
        } else {
            Decimal::ZERO
        };
        Self {
            regime,
            regime_label: regime.label().to_string(),
            base_value,
            taxes,
            total_taxes,
            effective_rate,
            monthly_breakdown,
        }
    }
}

/// Formats a fractional rate as a Brazilian percentage string, e.g.
/// `0.275` → `"27,50%"`.
pub fn format_tax_rate(rate: Decimal) -> String {
    let percent = (rate * Decimal::ONE_HUNDRED).round_dp(2);
    format!("{percent:.2}%").replace('.', ",")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn format_tax_rate_uses_comma_and_two_places() {
        assert_eq!(format_tax_rate(dec!(0.275)), "27,50%");
        assert_eq!(format_tax_rate(dec!(0.0065)), "0,65%");
        assert_eq!(format_tax_rate(dec!(0)), "0,00%");
    }

    #[test]
    fn from_items_totals_and_rate() {
        let items = vec![
            TaxBreakdownItem {
                tax_type: TaxType::Pis,
                tax_label: TaxType::Pis.label().to_string(),
                base_value: dec!(100000),
                rate: dec!(0.0065),
                rate_display: format_tax_rate(dec!(0.0065)),
                calculated_amount: dec!(650.00),
                notes: None,
            },
            TaxBreakdownItem {
                tax_type: TaxType::Cofins,
                tax_label: TaxType::Cofins.label().to_string(),
                base_value: dec!(100000),
                rate: dec!(0.03),
                rate_display: format_tax_rate(dec!(0.03)),
                calculated_amount: dec!(3000.00),
                notes: None,
            },
        ];

        let result = TaxCalculationResult::from_items(
            TaxRegime::LucroPresumido,
            dec!(100000),
            dec!(100000),
            items,
            Vec::new(),
        );

        assert_eq!(result.total_taxes, dec!(3650.00));
        assert_eq!(result.effective_rate, dec!(0.0365));
        assert_eq!(result.regime_label, "Lucro Presumido");
    }

    #[test]
    fn from_items_zero_gross_income_has_zero_rate() {
        let result = TaxCalculationResult::from_items(
            TaxRegime::Simples,
            dec!(0),
            dec!(0),
            Vec::new(),
            Vec::new(),
        );

        assert_eq!(result.total_taxes, dec!(0));
        assert_eq!(result.effective_rate, dec!(0));
    }
}
