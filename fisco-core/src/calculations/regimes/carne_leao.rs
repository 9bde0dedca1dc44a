//! PF Carnê-Leão: the individual professional's monthly self-assessed regime.
//!
//! Pipeline: IRPF on income net of livro-caixa expenses (progressive, monthly
//! when per-month aggregates are supplied), INSS on gross income clamped to
//! the contribution ceiling, and ISS at the municipal rate.

use rust_decimal::Decimal;

use crate::calculations::common::floor_zero;
use crate::calculations::error::CalculationError;
use crate::calculations::flat::compute_flat;
use crate::calculations::progressive::compute_progressive;
use crate::calculations::regimes::with_degenerate_note;
use crate::calculations::snapshot::ConfigSnapshot;
use crate::models::{
    MonthlyTaxBreakdown, MonthlyTaxInput, TaxBreakdownItem, TaxCalculationInput,
    TaxCalculationResult, TaxRegime, TaxType, format_tax_rate,
};

pub struct CarneLeaoCalculator<'a> {
    snapshot: &'a ConfigSnapshot,
}

impl<'a> CarneLeaoCalculator<'a> {
    pub fn new(snapshot: &'a ConfigSnapshot) -> Self {
        Self { snapshot }
    }

    /// Computes the Carnê-Leão breakdown.
    ///
    /// With monthly inputs the IRPF is assessed month by month against the
    /// configured (monthly) table, which is how the regime actually works;
    /// without them the annual base goes against the table as stored, so an
    /// annual-equivalent table must be configured.
    ///
    /// # Errors
    ///
    /// [`CalculationError`] when an `irpf`/`inss`/`iss` configuration is
    /// missing or its bracket table fails validation.
    pub fn calculate(
        &self,
        input: &TaxCalculationInput,
        monthly_inputs: &[MonthlyTaxInput],
    ) -> Result<TaxCalculationResult, CalculationError> {
        let regime = TaxRegime::PfCarneLeao;
        let base = floor_zero(input.pf_gross_income - input.pf_deductible_expenses);

        let mut taxes = Vec::with_capacity(3);
        let mut monthly_breakdown = Vec::new();

        // IRPF
        let irpf_config = self.snapshot.require(regime, TaxType::Irpf)?;
        if monthly_inputs.is_empty() {
            let outcome = compute_progressive(base, irpf_config)?;
            let effective_rate = if base > Decimal::ZERO {
                outcome.amount / base
            } else {
                Decimal::ZERO
            };
            taxes.push(TaxBreakdownItem {
                tax_type: TaxType::Irpf,
                tax_label: TaxType::Irpf.label().to_string(),
                base_value: base,
                rate: effective_rate,
                rate_display: "Progressivo".to_string(),
                calculated_amount: outcome.amount,
                notes: with_degenerate_note(
                    Some("Estimativa anual pela tabela progressiva".to_string()),
                    outcome.degenerate_rate,
                ),
            });
        } else {
            let mut total = Decimal::ZERO;
            let mut degenerate = false;
            for month in monthly_inputs {
                let monthly_base = floor_zero(month.pf_income - month.deductible_expenses);
                let outcome = compute_progressive(monthly_base, irpf_config)?;
                total += outcome.amount;
                degenerate |= outcome.degenerate_rate;
                monthly_breakdown.push(MonthlyTaxBreakdown {
                    month: month.month,
                    month_name: month.month_name.clone(),
                    base_value: monthly_base,
                    tax_amount: outcome.amount,
                    effective_rate: if monthly_base > Decimal::ZERO {
                        outcome.amount / monthly_base
                    } else {
                        Decimal::ZERO
                    },
                    bracket_order: Some(outcome.bracket_order),
                });
            }
            let effective_rate = if base > Decimal::ZERO {
                total / base
            } else {
                Decimal::ZERO
            };
            taxes.push(TaxBreakdownItem {
                tax_type: TaxType::Irpf,
                tax_label: TaxType::Irpf.label().to_string(),
                base_value: base,
                rate: effective_rate,
                rate_display: "Progressivo".to_string(),
                calculated_amount: total,
                notes: with_degenerate_note(
                    Some("Calculo mensal pela tabela progressiva".to_string()),
                    degenerate,
                ),
            });
        }

        // INSS, base clamped to the configured contribution ceiling
        let inss_config = self.snapshot.require(regime, TaxType::Inss)?;
        let inss_rate = self.snapshot.require_flat_rate(inss_config)?;
        let inss_base = match inss_config.base_cap {
            Some(cap) => input.pf_gross_income.min(cap),
            None => input.pf_gross_income,
        };
        let inss = compute_flat(inss_base, inss_rate, None);
        let inss_notes = if inss_base < input.pf_gross_income {
            "Contribuicao previdenciaria autonomo. Base limitada ao teto de contribuicao"
        } else {
            "Contribuicao previdenciaria autonomo"
        };
        taxes.push(TaxBreakdownItem {
            tax_type: TaxType::Inss,
            tax_label: TaxType::Inss.label().to_string(),
            base_value: inss_base,
            rate: inss_rate,
            rate_display: format_tax_rate(inss_rate),
            calculated_amount: inss.amount,
            notes: with_degenerate_note(Some(inss_notes.to_string()), inss.degenerate_rate),
        });

        // ISS at the municipal rate
        let iss_config = self.snapshot.require(regime, TaxType::Iss)?;
        let iss_rate = self.snapshot.iss_rate(iss_config)?;
        let iss = compute_flat(input.pf_gross_income, iss_rate, None);
        taxes.push(TaxBreakdownItem {
            tax_type: TaxType::Iss,
            tax_label: TaxType::Iss.label().to_string(),
            base_value: input.pf_gross_income,
            rate: iss_rate,
            rate_display: format_tax_rate(iss_rate),
            calculated_amount: iss.amount,
            notes: with_degenerate_note(None, iss.degenerate_rate),
        });

        Ok(TaxCalculationResult::from_items(
            regime,
            base,
            input.pf_gross_income,
            taxes,
            monthly_breakdown,
        ))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use crate::models::{TaxRateBracket, TaxRateConfiguration};

    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
    }

    fn annual_irpf() -> TaxRateConfiguration {
        TaxRateConfiguration::progressive(
            "clinic-1",
            TaxRegime::PfCarneLeao,
            TaxType::Irpf,
            vec![
                TaxRateBracket {
                    order: 1,
                    min_value: dec!(0),
                    max_value: Some(dec!(60000)),
                    rate: dec!(0),
                    deduction: dec!(0),
                },
                TaxRateBracket {
                    order: 2,
                    min_value: dec!(60000),
                    max_value: Some(dec!(88200)),
                    rate: dec!(0.15),
                    deduction: dec!(9000),
                },
                TaxRateBracket {
                    order: 3,
                    min_value: dec!(88200),
                    max_value: None,
                    rate: dec!(0.275),
                    deduction: dec!(10904.76),
                },
            ],
            date(),
        )
    }

    fn monthly_irpf() -> TaxRateConfiguration {
        TaxRateConfiguration::progressive(
            "clinic-1",
            TaxRegime::PfCarneLeao,
            TaxType::Irpf,
            vec![
                TaxRateBracket {
                    order: 1,
                    min_value: dec!(0),
                    max_value: Some(dec!(5000)),
                    rate: dec!(0),
                    deduction: dec!(0),
                },
                TaxRateBracket {
                    order: 2,
                    min_value: dec!(5000),
                    max_value: Some(dec!(7350)),
                    rate: dec!(0.15),
                    deduction: dec!(750),
                },
                TaxRateBracket {
                    order: 3,
                    min_value: dec!(7350),
                    max_value: None,
                    rate: dec!(0.275),
                    deduction: dec!(908.73),
                },
            ],
            date(),
        )
    }

    fn snapshot_with(irpf: TaxRateConfiguration) -> ConfigSnapshot {
        let inss = TaxRateConfiguration::flat(
            "clinic-1",
            TaxRegime::PfCarneLeao,
            TaxType::Inss,
            dec!(0.20),
            date(),
        );
        let iss = TaxRateConfiguration::flat(
            "clinic-1",
            TaxRegime::PfCarneLeao,
            TaxType::Iss,
            dec!(0.05),
            date(),
        );
        ConfigSnapshot::new(vec![irpf, inss, iss])
    }

    fn input() -> TaxCalculationInput {
        TaxCalculationInput {
            pf_gross_income: dec!(120000),
            pf_deductible_expenses: dec!(20000),
            ..TaxCalculationInput::empty()
        }
    }

    #[test]
    fn annual_path_computes_three_items() {
        let snapshot = snapshot_with(annual_irpf());
        let result = CarneLeaoCalculator::new(&snapshot)
            .calculate(&input(), &[])
            .unwrap();

        assert_eq!(result.base_value, dec!(100000));
        assert_eq!(result.taxes.len(), 3);
        // IRPF: 100000 * 0.275 - 10904.76
        assert_eq!(result.taxes[0].calculated_amount, dec!(16595.24));
        // INSS: 120000 * 0.20
        assert_eq!(result.taxes[1].calculated_amount, dec!(24000.00));
        // ISS: 120000 * 0.05
        assert_eq!(result.taxes[2].calculated_amount, dec!(6000.00));
        assert_eq!(result.total_taxes, dec!(46595.24));
        // Effective rate against gross income, not the taxed base.
        assert_eq!(result.effective_rate, result.total_taxes / dec!(120000));
        assert!(result.monthly_breakdown.is_empty());
    }

    #[test]
    fn expenses_never_push_the_base_negative() {
        let snapshot = snapshot_with(annual_irpf());
        let input = TaxCalculationInput {
            pf_gross_income: dec!(10000),
            pf_deductible_expenses: dec!(25000),
            ..TaxCalculationInput::empty()
        };

        let result = CarneLeaoCalculator::new(&snapshot)
            .calculate(&input, &[])
            .unwrap();

        assert_eq!(result.base_value, dec!(0));
        assert_eq!(result.taxes[0].calculated_amount, dec!(0));
    }

    #[test]
    fn monthly_path_assesses_each_month_separately() {
        let snapshot = snapshot_with(monthly_irpf());
        let months: Vec<MonthlyTaxInput> = (1..=12)
            .map(|m| MonthlyTaxInput {
                month: m,
                month_name: format!("M{m}"),
                pf_income: dec!(10000),
                pj_income: dec!(0),
                deductible_expenses: dec!(1666.67),
                irrf_withheld: dec!(0),
            })
            .collect();
        let input = TaxCalculationInput {
            pf_gross_income: dec!(120000),
            pf_deductible_expenses: dec!(20000.04),
            ..TaxCalculationInput::empty()
        };

        let result = CarneLeaoCalculator::new(&snapshot)
            .calculate(&input, &months)
            .unwrap();

        // Each month: 8333.33 * 0.275 - 908.73 = 1382.94 (rounded)
        assert_eq!(result.monthly_breakdown.len(), 12);
        assert_eq!(result.monthly_breakdown[0].tax_amount, dec!(1382.94));
        assert_eq!(result.monthly_breakdown[0].bracket_order, Some(3));
        assert_eq!(result.taxes[0].calculated_amount, dec!(16595.28));
    }

    #[test]
    fn inss_base_is_clamped_to_the_configured_ceiling() {
        let irpf = annual_irpf();
        let inss = TaxRateConfiguration::flat(
            "clinic-1",
            TaxRegime::PfCarneLeao,
            TaxType::Inss,
            dec!(0.20),
            date(),
        )
        .with_base_cap(dec!(97888.92));
        let iss = TaxRateConfiguration::flat(
            "clinic-1",
            TaxRegime::PfCarneLeao,
            TaxType::Iss,
            dec!(0.05),
            date(),
        );
        let snapshot = ConfigSnapshot::new(vec![irpf, inss, iss]);

        let result = CarneLeaoCalculator::new(&snapshot)
            .calculate(&input(), &[])
            .unwrap();

        let inss_item = &result.taxes[1];
        assert_eq!(inss_item.base_value, dec!(97888.92));
        assert_eq!(inss_item.calculated_amount, dec!(19577.78));
        assert!(inss_item.notes.as_deref().unwrap().contains("teto"));
    }

    #[test]
    fn municipal_rate_overrides_iss() {
        let snapshot = snapshot_with(annual_irpf()).with_municipal_iss_rate(Some(dec!(0.02)));

        let result = CarneLeaoCalculator::new(&snapshot)
            .calculate(&input(), &[])
            .unwrap();

        assert_eq!(result.taxes[2].rate, dec!(0.02));
        assert_eq!(result.taxes[2].calculated_amount, dec!(2400.00));
    }

    #[test]
    fn missing_irpf_configuration_fails() {
        let snapshot = ConfigSnapshot::new(Vec::new());

        let result = CarneLeaoCalculator::new(&snapshot).calculate(&input(), &[]);

        assert_eq!(
            result,
            Err(CalculationError::MissingConfiguration {
                regime: TaxRegime::PfCarneLeao,
                tax_type: TaxType::Irpf,
            })
        );
    }
}
