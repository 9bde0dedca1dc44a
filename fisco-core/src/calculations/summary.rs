//! The year-level aggregator: one PF side, one PJ side, combined totals.
//!
//! Input validation is fail-fast; per-side configuration failures degrade
//! softly, so a clinic with a broken Simples table still sees its Carne-Leao
//! estimate and a recorded error for the other side.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::calculations::error::{CalculationError, InputError};
use crate::calculations::fator_r::FatorRSelection;
use crate::calculations::regimes::{
    CarneLeaoCalculator, LucroPresumidoCalculator, LucroRealCalculator, SimplesCalculator,
};
use crate::calculations::snapshot::ConfigSnapshot;
use crate::models::{
    FiscalProfile, MonthlyTaxInput, TaxCalculationInput, TaxCalculationResult, TaxRegime,
};
use crate::store::{StoreError, TaxConfigStore};

/// What to compute for one clinic-year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculateTaxesOptions {
    pub year: i32,
    /// Corporate regime for the PJ side; `None` skips it.
    pub pj_regime: Option<TaxRegime>,
    /// Whether to run the Carne-Leao side.
    pub include_pf: bool,
    pub fator_r: FatorRSelection,
    /// Month-level PF figures; empty means annual assessment.
    pub monthly_inputs: Vec<MonthlyTaxInput>,
}

impl CalculateTaxesOptions {
    /// Derives the options from a clinic's fiscal profile.
    pub fn from_profile(profile: &FiscalProfile, year: i32) -> Self {
        Self {
            year,
            pj_regime: profile.pj_enabled.then_some(profile.pj_regime).flatten(),
            include_pf: profile.pf_enabled && profile.pf_uses_carne_leao,
            fator_r: FatorRSelection::from_profile(profile),
            monthly_inputs: Vec::new(),
        }
    }
}

/// The combined PF + PJ estimate for one year.
///
/// A side that was not requested has `None` in both its calculation and error
/// slots; a side that failed carries the error and no calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxSummary {
    pub year: i32,

    pub pf_calculation: Option<TaxCalculationResult>,
    pub pf_error: Option<CalculationError>,
    pub pj_calculation: Option<TaxCalculationResult>,
    pub pj_error: Option<CalculationError>,

    pub total_pf_taxes: Decimal,
    pub total_pj_taxes: Decimal,
    pub combined_total_taxes: Decimal,

    /// Withholding already paid, credited against the combined total.
    pub irrf_already_paid: Decimal,
    /// Positive means tax still owed, negative a refund position.
    pub balance_due: Decimal,

    pub pf_effective_rate: Decimal,
    pub pj_effective_rate: Decimal,
    pub combined_effective_rate: Decimal,
}

/// Entry point tying the regime calculators together over one snapshot.
pub struct TaxEngine {
    snapshot: ConfigSnapshot,
}

impl TaxEngine {
    pub fn new(snapshot: ConfigSnapshot) -> Self {
        Self { snapshot }
    }

    /// Builds an engine from the configuration store, resolving the municipal
    /// ISS rate for the profile's city/state.
    ///
    /// # Errors
    ///
    /// [`StoreError`] when the store cannot produce the clinic's
    /// configurations.
    pub async fn from_store(
        store: &dyn TaxConfigStore,
        profile: &FiscalProfile,
    ) -> Result<Self, StoreError> {
        let configurations = store.fetch_configurations(&profile.clinic_id).await?;
        let municipal = store
            .resolve_municipal_rate(
                &profile.clinic_id,
                profile.pf_city.as_deref(),
                profile.pf_state.as_deref(),
            )
            .await?;
        Ok(Self::new(
            ConfigSnapshot::new(configurations).with_municipal_iss_rate(municipal),
        ))
    }

    pub fn snapshot(&self) -> &ConfigSnapshot {
        &self.snapshot
    }

    /// Runs both sides and assembles the summary.
    ///
    /// # Errors
    ///
    /// [`InputError`] when a monetary input is negative or the period length
    /// is not positive. Configuration failures do not error here; they are
    /// recorded per side on the summary.
    pub fn calculate_taxes(
        &self,
        input: &TaxCalculationInput,
        options: &CalculateTaxesOptions,
    ) -> Result<TaxSummary, InputError> {
        validate_input(input, &options.monthly_inputs)?;

        let (pf_calculation, pf_error) = if options.include_pf {
            match CarneLeaoCalculator::new(&self.snapshot)
                .calculate(input, &options.monthly_inputs)
            {
                Ok(result) => (Some(result), None),
                Err(error) => {
                    warn!(year = options.year, %error, "carne-leao side failed");
                    (None, Some(error))
                }
            }
        } else {
            (None, None)
        };

        let (pj_calculation, pj_error) = match options.pj_regime {
            None => (None, None),
            Some(regime) => match self.calculate_pj(regime, input, options) {
                Ok(result) => (Some(result), None),
                Err(error) => {
                    warn!(year = options.year, %regime, %error, "corporate side failed");
                    (None, Some(error))
                }
            },
        };

        let total_pf_taxes = pf_calculation
            .as_ref()
            .map(|c| c.total_taxes)
            .unwrap_or(Decimal::ZERO);
        let total_pj_taxes = pj_calculation
            .as_ref()
            .map(|c| c.total_taxes)
            .unwrap_or(Decimal::ZERO);
        let combined_total_taxes = total_pf_taxes + total_pj_taxes;

        let irrf_already_paid = if options.monthly_inputs.is_empty() {
            input.irrf_withheld
        } else {
            options
                .monthly_inputs
                .iter()
                .map(|m| m.irrf_withheld)
                .sum()
        };
        let balance_due = combined_total_taxes - irrf_already_paid;

        let pf_effective_rate = pf_calculation
            .as_ref()
            .map(|c| c.effective_rate)
            .unwrap_or(Decimal::ZERO);
        let pj_effective_rate = pj_calculation
            .as_ref()
            .map(|c| c.effective_rate)
            .unwrap_or(Decimal::ZERO);
        let combined_gross = input.pf_gross_income + input.pj_gross_income;
        let combined_effective_rate = if combined_gross > Decimal::ZERO {
            combined_total_taxes / combined_gross
        } else {
            Decimal::ZERO
        };

        Ok(TaxSummary {
            year: options.year,
            pf_calculation,
            pf_error,
            pj_calculation,
            pj_error,
            total_pf_taxes,
            total_pj_taxes,
            combined_total_taxes,
            irrf_already_paid,
            balance_due,
            pf_effective_rate,
            pj_effective_rate,
            combined_effective_rate,
        })
    }

    fn calculate_pj(
        &self,
        regime: TaxRegime,
        input: &TaxCalculationInput,
        options: &CalculateTaxesOptions,
    ) -> Result<TaxCalculationResult, CalculationError> {
        match regime {
            TaxRegime::Simples => SimplesCalculator::new(&self.snapshot).calculate(
                input,
                options.fator_r,
                &options.monthly_inputs,
            ),
            TaxRegime::LucroPresumido => {
                LucroPresumidoCalculator::new(&self.snapshot).calculate(input)
            }
            TaxRegime::LucroReal => LucroRealCalculator::new(&self.snapshot).calculate(input),
            TaxRegime::PfCarneLeao => Err(CalculationError::NotACorporateRegime(regime)),
        }
    }
}

fn validate_input(
    input: &TaxCalculationInput,
    monthly_inputs: &[MonthlyTaxInput],
) -> Result<(), InputError> {
    let non_negative: [(&'static str, Decimal); 6] = [
        ("pf_gross_income", input.pf_gross_income),
        ("pj_gross_income", input.pj_gross_income),
        ("pf_deductible_expenses", input.pf_deductible_expenses),
        (
            "pj_deductible_expenses",
            input.pj_deductible_expenses.unwrap_or(Decimal::ZERO),
        ),
        ("irrf_withheld", input.irrf_withheld),
        ("rbt12", input.rbt12),
    ];
    for (field, value) in non_negative {
        if value < Decimal::ZERO {
            return Err(InputError::NegativeValue { field, value });
        }
    }
    for month in monthly_inputs {
        let monthly: [(&'static str, Decimal); 4] = [
            ("monthly pf_income", month.pf_income),
            ("monthly pj_income", month.pj_income),
            ("monthly deductible_expenses", month.deductible_expenses),
            ("monthly irrf_withheld", month.irrf_withheld),
        ];
        for (field, value) in monthly {
            if value < Decimal::ZERO {
                return Err(InputError::NegativeValue { field, value });
            }
        }
    }
    if input.months_in_period <= 0 {
        return Err(InputError::InvalidMonthsInPeriod(input.months_in_period));
    }
    Ok(())
}
