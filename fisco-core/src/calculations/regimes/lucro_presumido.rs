//! Lucro Presumido: corporate taxes on a presumed profit margin.
//!
//! IRPJ and CSLL apply their rate to `gross * presumption_rate`; PIS, COFINS
//! and ISS apply directly to gross revenue. The IRPJ surcharge taxes the
//! presumed profit above the monthly threshold scaled by the period length.

use rust_decimal::Decimal;

use crate::calculations::common::floor_zero;
use crate::calculations::error::CalculationError;
use crate::calculations::flat::compute_flat;
use crate::calculations::regimes::with_degenerate_note;
use crate::calculations::snapshot::ConfigSnapshot;
use crate::models::{
    TaxBreakdownItem, TaxCalculationInput, TaxCalculationResult, TaxRateConfiguration, TaxRegime,
    TaxType, format_tax_rate,
};

pub struct LucroPresumidoCalculator<'a> {
    snapshot: &'a ConfigSnapshot,
}

impl<'a> LucroPresumidoCalculator<'a> {
    pub fn new(snapshot: &'a ConfigSnapshot) -> Self {
        Self { snapshot }
    }

    /// Produces the six-item breakdown: IRPJ, IRPJ Adicional, CSLL, PIS,
    /// COFINS and ISS. Items compute to zero rather than being omitted.
    ///
    /// # Errors
    ///
    /// [`CalculationError`] when any of the six configurations is missing,
    /// lacks a flat rate, or the surcharge lacks a monthly threshold.
    pub fn calculate(
        &self,
        input: &TaxCalculationInput,
    ) -> Result<TaxCalculationResult, CalculationError> {
        let gross = input.pj_gross_income;

        let irpj = self.presumed_item(gross, TaxType::Irpj, None)?;
        let adicional = self.surcharge_item(gross, input.months_in_period)?;
        let csll = self.presumed_item(gross, TaxType::Csll, None)?;
        let pis = self.presumed_item(gross, TaxType::Pis, Some("Regime cumulativo"))?;
        let cofins = self.presumed_item(gross, TaxType::Cofins, Some("Regime cumulativo"))?;
        let iss = self.iss_item(gross)?;

        Ok(TaxCalculationResult::from_items(
            TaxRegime::LucroPresumido,
            gross,
            gross,
            vec![irpj, adicional, csll, pis, cofins, iss],
            Vec::new(),
        ))
    }

    fn presumed_item(
        &self,
        gross: Decimal,
        tax_type: TaxType,
        note: Option<&str>,
    ) -> Result<TaxBreakdownItem, CalculationError> {
        let config = self.snapshot.require(TaxRegime::LucroPresumido, tax_type)?;
        let rate = self.snapshot.require_flat_rate(config)?;
        let outcome = compute_flat(gross, rate, config.presumption_rate);

        let notes = match (config.presumption_rate, note) {
            (Some(presumption), _) => Some(format!(
                "Base presumida de {} sobre a receita",
                format_tax_rate(presumption)
            )),
            (None, Some(note)) => Some(note.to_string()),
            (None, None) => None,
        };

        Ok(TaxBreakdownItem {
            tax_type,
            tax_label: tax_type.label().to_string(),
            base_value: outcome.effective_base,
            rate,
            rate_display: format_tax_rate(rate),
            calculated_amount: outcome.amount,
            notes: with_degenerate_note(notes, outcome.degenerate_rate),
        })
    }

    fn surcharge_item(
        &self,
        gross: Decimal,
        months_in_period: i32,
    ) -> Result<TaxBreakdownItem, CalculationError> {
        let config = self
            .snapshot
            .require(TaxRegime::LucroPresumido, TaxType::IrpjAdicional)?;
        let rate = self.snapshot.require_flat_rate(config)?;

        let presumed_base = match config.presumption_rate {
            Some(presumption) => gross * presumption,
            None => gross,
        };
        let excess = surcharge_excess(presumed_base, config, months_in_period)?;
        let outcome = compute_flat(excess, rate, None);

        Ok(TaxBreakdownItem {
            tax_type: TaxType::IrpjAdicional,
            tax_label: TaxType::IrpjAdicional.label().to_string(),
            base_value: excess,
            rate,
            rate_display: format_tax_rate(rate),
            calculated_amount: outcome.amount,
            notes: with_degenerate_note(
                Some("Adicional sobre o lucro excedente ao limite legal".to_string()),
                outcome.degenerate_rate,
            ),
        })
    }

    fn iss_item(&self, gross: Decimal) -> Result<TaxBreakdownItem, CalculationError> {
        let config = self.snapshot.require(TaxRegime::LucroPresumido, TaxType::Iss)?;
        let rate = self.snapshot.iss_rate(config)?;
        let outcome = compute_flat(gross, rate, None);

        let notes = self
            .snapshot
            .municipal_iss_rate()
            .map(|_| "Aliquota municipal aplicada".to_string());

        Ok(TaxBreakdownItem {
            tax_type: TaxType::Iss,
            tax_label: TaxType::Iss.label().to_string(),
            base_value: gross,
            rate,
            rate_display: format_tax_rate(rate),
            calculated_amount: outcome.amount,
            notes: with_degenerate_note(notes, outcome.degenerate_rate),
        })
    }
}

/// The portion of the profit base above `monthly_threshold * months`, floored
/// at zero. Shared with the Lucro Real pipeline.
pub(crate) fn surcharge_excess(
    profit_base: Decimal,
    config: &TaxRateConfiguration,
    months_in_period: i32,
) -> Result<Decimal, CalculationError> {
    let threshold = config
        .monthly_threshold
        .ok_or(CalculationError::MissingSurchargeThreshold {
            regime: config.regime,
            tax_type: config.tax_type,
        })?;
    let limit = threshold * Decimal::from(months_in_period);
    Ok(floor_zero(profit_base - limit))
}
