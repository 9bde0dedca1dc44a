//! Read-only configuration snapshot consumed by the calculators.
//!
//! The caller fetches a clinic's configurations (and resolves its municipal
//! ISS rate) once, before computation; everything after that is pure
//! arithmetic over this snapshot.

use rust_decimal::Decimal;

use crate::calculations::error::CalculationError;
use crate::models::{TaxRateConfiguration, TaxRegime, TaxType};

/// A clinic's active configurations plus the resolved municipal ISS rate.
///
/// Duplicate active configurations for the same `(regime, tax_type)` can
/// exist if the store's first-run seed raced; lookup tolerates them by
/// selecting the most recently effective one.
#[derive(Debug, Clone, Default)]
pub struct ConfigSnapshot {
    configurations: Vec<TaxRateConfiguration>,
    municipal_iss_rate: Option<Decimal>,
}

impl ConfigSnapshot {
    pub fn new(configurations: Vec<TaxRateConfiguration>) -> Self {
        Self {
            configurations,
            municipal_iss_rate: None,
        }
    }

    /// Attaches the municipal ISS rate resolved for the clinic's city/state.
    /// When present it overrides the ISS configuration's own flat rate.
    pub fn with_municipal_iss_rate(mut self, rate: Option<Decimal>) -> Self {
        self.municipal_iss_rate = rate;
        self
    }

    pub fn municipal_iss_rate(&self) -> Option<Decimal> {
        self.municipal_iss_rate
    }

    pub fn configurations(&self) -> &[TaxRateConfiguration] {
        &self.configurations
    }

    /// The latest-effective active configuration for a key, if any.
    pub fn lookup(&self, regime: TaxRegime, tax_type: TaxType) -> Option<&TaxRateConfiguration> {
        self.configurations
            .iter()
            .filter(|c| c.is_active && c.regime == regime && c.tax_type == tax_type)
            .max_by_key(|c| c.effective_from)
    }

    /// Like [`lookup`](Self::lookup), but a missing configuration is the
    /// calculation error the regime pipelines surface.
    pub fn require(
        &self,
        regime: TaxRegime,
        tax_type: TaxType,
    ) -> Result<&TaxRateConfiguration, CalculationError> {
        self.lookup(regime, tax_type)
            .ok_or(CalculationError::MissingConfiguration { regime, tax_type })
    }

    /// The flat rate of a configuration, or the error naming its key.
    pub fn require_flat_rate(
        &self,
        config: &TaxRateConfiguration,
    ) -> Result<Decimal, CalculationError> {
        config.flat_rate.ok_or(CalculationError::MissingFlatRate {
            regime: config.regime,
            tax_type: config.tax_type,
        })
    }

    /// The ISS rate to apply: the municipal override when resolved, else the
    /// ISS configuration's own flat rate.
    pub fn iss_rate(&self, config: &TaxRateConfiguration) -> Result<Decimal, CalculationError> {
        match self.municipal_iss_rate {
            Some(rate) => Ok(rate),
            None => self.require_flat_rate(config),
        }
    }
}
