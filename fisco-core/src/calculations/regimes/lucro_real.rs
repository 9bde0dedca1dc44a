//! Lucro Real: corporate taxes on actual accounting profit.
//!
//! IRPJ, its surcharge and CSLL apply to the real profit; PIS, COFINS and ISS
//! still apply to gross revenue. Profit comes from the input when reported,
//! otherwise it is derived as gross minus deductible expenses.

use rust_decimal::Decimal;

use crate::calculations::common::floor_zero;
use crate::calculations::error::CalculationError;
use crate::calculations::flat::compute_flat;
use crate::calculations::regimes::lucro_presumido::surcharge_excess;
use crate::calculations::regimes::with_degenerate_note;
use crate::calculations::snapshot::ConfigSnapshot;
use crate::models::{
    TaxBreakdownItem, TaxCalculationInput, TaxCalculationResult, TaxRegime, TaxType,
    format_tax_rate,
};

pub struct LucroRealCalculator<'a> {
    snapshot: &'a ConfigSnapshot,
}

impl<'a> LucroRealCalculator<'a> {
    pub fn new(snapshot: &'a ConfigSnapshot) -> Self {
        Self { snapshot }
    }

    /// Produces the six-item breakdown with profit-based and revenue-based
    /// items. A loss period floors the profit base at zero, so the profit
    /// taxes compute to zero while the revenue taxes remain due.
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
        let profit = match input.real_profit {
            Some(profit) => profit,
            None => gross - input.pj_deductible_expenses.unwrap_or(Decimal::ZERO),
        };
        let profit_base = floor_zero(profit);

        let irpj = self.profit_item(profit_base, TaxType::Irpj)?;
        let adicional = self.surcharge_item(profit_base, input.months_in_period)?;
        let csll = self.profit_item(profit_base, TaxType::Csll)?;
        let pis = self.revenue_item(gross, TaxType::Pis)?;
        let cofins = self.revenue_item(gross, TaxType::Cofins)?;
        let iss = self.iss_item(gross)?;

        Ok(TaxCalculationResult::from_items(
            TaxRegime::LucroReal,
            profit_base,
            gross,
            vec![irpj, adicional, csll, pis, cofins, iss],
            Vec::new(),
        ))
    }

    fn profit_item(
        &self,
        profit_base: Decimal,
        tax_type: TaxType,
    ) -> Result<TaxBreakdownItem, CalculationError> {
        let config = self.snapshot.require(TaxRegime::LucroReal, tax_type)?;
        let rate = self.snapshot.require_flat_rate(config)?;
        let outcome = compute_flat(profit_base, rate, None);

        Ok(TaxBreakdownItem {
            tax_type,
            tax_label: tax_type.label().to_string(),
            base_value: profit_base,
            rate,
            rate_display: format_tax_rate(rate),
            calculated_amount: outcome.amount,
            notes: with_degenerate_note(
                Some("Sobre o lucro real apurado".to_string()),
                outcome.degenerate_rate,
            ),
        })
    }

    fn surcharge_item(
        &self,
        profit_base: Decimal,
        months_in_period: i32,
    ) -> Result<TaxBreakdownItem, CalculationError> {
        let config = self
            .snapshot
            .require(TaxRegime::LucroReal, TaxType::IrpjAdicional)?;
        let rate = self.snapshot.require_flat_rate(config)?;
        let excess = surcharge_excess(profit_base, config, months_in_period)?;
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

    fn revenue_item(
        &self,
        gross: Decimal,
        tax_type: TaxType,
    ) -> Result<TaxBreakdownItem, CalculationError> {
        let config = self.snapshot.require(TaxRegime::LucroReal, tax_type)?;
        let rate = self.snapshot.require_flat_rate(config)?;
        let outcome = compute_flat(gross, rate, None);

        Ok(TaxBreakdownItem {
            tax_type,
            tax_label: tax_type.label().to_string(),
            base_value: gross,
            rate,
            rate_display: format_tax_rate(rate),
            calculated_amount: outcome.amount,
            notes: with_degenerate_note(
                Some("Regime nao-cumulativo (creditos nao considerados)".to_string()),
                outcome.degenerate_rate,
            ),
        })
    }

    fn iss_item(&self, gross: Decimal) -> Result<TaxBreakdownItem, CalculationError> {
        let config = self.snapshot.require(TaxRegime::LucroReal, TaxType::Iss)?;
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
