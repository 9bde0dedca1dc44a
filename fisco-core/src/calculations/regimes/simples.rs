//! Simples Nacional: one consolidated DAS payment.
//!
//! The annex (III or V) is resolved via Fator R, the bracket is looked up on
//! RBT12 (trailing-12-month revenue), and the matched bracket's rate and
//! deduction are applied to the period's gross revenue.

use rust_decimal::Decimal;

use crate::calculations::common::{floor_zero, round_half_up};
use crate::calculations::error::CalculationError;
use crate::calculations::fator_r::{FatorRSelection, resolve_anexo};
use crate::calculations::progressive::compute_progressive;
use crate::calculations::regimes::with_degenerate_note;
use crate::calculations::snapshot::ConfigSnapshot;
use crate::models::{
    MonthlyTaxBreakdown, MonthlyTaxInput, SimplesAnexo, TaxBreakdownItem, TaxCalculationInput,
    TaxCalculationResult, TaxRegime, format_tax_rate,
};

pub struct SimplesCalculator<'a> {
    snapshot: &'a ConfigSnapshot,
}

impl<'a> SimplesCalculator<'a> {
    pub fn new(snapshot: &'a ConfigSnapshot) -> Self {
        Self { snapshot }
    }

    /// Computes the single DAS breakdown item.
    ///
    /// With monthly inputs the effective rate implied by the RBT12 bracket is
    /// applied to each month's own PJ revenue and the DAS is the sum of the
    /// monthly guias; without them the bracket's rate and deduction go
    /// straight against the period's gross revenue.
    ///
    /// An RBT12 of zero (brand-new clinic) falls back to the period's gross
    /// revenue for the bracket lookup.
    ///
    /// # Errors
    ///
    /// [`CalculationError`] when the resolved annex has no configuration or
    /// its bracket table fails validation.
    pub fn calculate(
        &self,
        input: &TaxCalculationInput,
        selection: FatorRSelection,
        monthly_inputs: &[MonthlyTaxInput],
    ) -> Result<TaxCalculationResult, CalculationError> {
        let gross = input.pj_gross_income;
        let resolution = resolve_anexo(selection, input.rbt12);
        let tax_type = resolution.anexo.das_tax_type();

        let config = self.snapshot.require(TaxRegime::Simples, tax_type)?;
        let lookup_base = if input.rbt12 > Decimal::ZERO {
            input.rbt12
        } else {
            gross
        };
        // The bracket is matched on RBT12; its rate and deduction then apply
        // to the period's own revenue.
        let bracket = compute_progressive(lookup_base, config)?;

        let mut monthly_breakdown = Vec::new();
        let das = if monthly_inputs.is_empty() {
            floor_zero(round_half_up(gross * bracket.rate - bracket.deduction))
        } else {
            // The deduction is folded into an effective rate over RBT12 so
            // each monthly guia is a plain rate times the month's revenue.
            let monthly_rate = if lookup_base > Decimal::ZERO {
                floor_zero(bracket.rate - bracket.deduction / lookup_base)
            } else {
                Decimal::ZERO
            };
            let mut total = Decimal::ZERO;
            for month in monthly_inputs {
                let tax_amount = round_half_up(month.pj_income * monthly_rate);
                total += tax_amount;
                monthly_breakdown.push(MonthlyTaxBreakdown {
                    month: month.month,
                    month_name: month.month_name.clone(),
                    base_value: month.pj_income,
                    tax_amount,
                    effective_rate: monthly_rate,
                    bracket_order: Some(bracket.bracket_order),
                });
            }
            total
        };

        let effective_rate = if gross > Decimal::ZERO {
            das / gross
        } else {
            Decimal::ZERO
        };

        let anexo_label = match resolution.anexo {
            SimplesAnexo::AnexoIii => "Anexo III",
            SimplesAnexo::AnexoV => "Anexo V",
        };
        let notes = match resolution.fator_r {
            Some(fator_r) => format!(
                "Fator R de {} - {} (faixa {} do RBT12)",
                format_tax_rate(fator_r),
                anexo_label,
                bracket.bracket_order,
            ),
            None => format!(
                "{} definido manualmente (faixa {} do RBT12)",
                anexo_label, bracket.bracket_order,
            ),
        };

        let item = TaxBreakdownItem {
            tax_type,
            tax_label: tax_type.label().to_string(),
            base_value: gross,
            rate: effective_rate,
            rate_display: format!(
                "{} (Faixa {})",
                format_tax_rate(bracket.rate),
                bracket.bracket_order
            ),
            calculated_amount: das,
            notes: with_degenerate_note(Some(notes), bracket.degenerate_rate),
        };

        Ok(TaxCalculationResult::from_items(
            TaxRegime::Simples,
            gross,
            gross,
            vec![item],
            monthly_breakdown,
        ))
    }
}
