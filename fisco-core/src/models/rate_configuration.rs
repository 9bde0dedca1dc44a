use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{RateType, TaxRegime, TaxType};

/// One rung of a progressive rate table.
///
/// `min_value` is inclusive, `max_value` exclusive; the top bracket of a table
/// is the only one with `max_value = None`. Brackets of one configuration are
/// contiguous: each bracket's `min_value` equals the previous bracket's
/// `max_value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRateBracket {
    /// 1-based position within the configuration, unique and contiguous.
    pub order: u32,
    pub min_value: Decimal,
    pub max_value: Option<Decimal>,
    /// Fraction in [0, 1]. Values outside the range are computed anyway but
    /// flagged on the breakdown item, since tables are user-editable.
    pub rate: Decimal,
    /// Fixed deduction subtracted after the rate is applied.
    pub deduction: Decimal,
}

/// A clinic's rate configuration for one `(regime, tax_type)` key.
///
/// The configuration is an aggregate root: it owns its bracket table by value,
/// ordered by [`TaxRateBracket::order`]. The engine is a pure reader; creation,
/// edits and seeding belong to the external configuration store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRateConfiguration {
    pub clinic_id: String,
    pub regime: TaxRegime,
    pub tax_type: TaxType,
    pub rate_type: RateType,

    /// Rate for `RateType::Flat` configurations.
    pub flat_rate: Option<Decimal>,
    /// Presumed-profit percentage applied to the base before the flat rate
    /// (Lucro Presumido IRPJ/CSLL).
    pub presumption_rate: Option<Decimal>,
    /// Ceiling clamped onto the base before the rate (INSS contribution
    /// ceiling). Jurisdiction value, stored here rather than in code.
    pub base_cap: Option<Decimal>,
    /// Monthly threshold for excess-over-threshold surcharges
    /// (IRPJ Adicional); the effective threshold is this value times
    /// `months_in_period`.
    pub monthly_threshold: Option<Decimal>,

    pub description: Option<String>,
    /// Start of validity. When duplicate active configurations exist for the
    /// same key, the engine selects the most recently effective one.
    pub effective_from: NaiveDate,
    pub is_active: bool,

    /// Bracket table for `RateType::Progressive` configurations, ordered by
    /// `order`. Empty for flat configurations.
    pub brackets: Vec<TaxRateBracket>,
}

impl TaxRateConfiguration {
    /// A flat-rate configuration with no presumption, cap or threshold.
    pub fn flat(
        clinic_id: impl Into<String>,
        regime: TaxRegime,
        tax_type: TaxType,
        flat_rate: Decimal,
        effective_from: NaiveDate,
    ) -> Self {
        Self {
            clinic_id: clinic_id.into(),
            regime,
            tax_type,
            rate_type: RateType::Flat,
            flat_rate: Some(flat_rate),
            presumption_rate: None,
            base_cap: None,
            monthly_threshold: None,
            description: None,
            effective_from,
            is_active: true,
            brackets: Vec::new(),
        }
    }

    /// A progressive configuration owning the given bracket table.
    pub fn progressive(
        clinic_id: impl Into<String>,
        regime: TaxRegime,
        tax_type: TaxType,
        brackets: Vec<TaxRateBracket>,
        effective_from: NaiveDate,
    ) -> Self {
        Self {
            clinic_id: clinic_id.into(),
            regime,
            tax_type,
            rate_type: RateType::Progressive,
            flat_rate: None,
            presumption_rate: None,
            base_cap: None,
            monthly_threshold: None,
            description: None,
            effective_from,
            is_active: true,
            brackets,
        }
    }

    pub fn with_presumption_rate(mut self, rate: Decimal) -> Self {
        self.presumption_rate = Some(rate);
        self
    }

    pub fn with_base_cap(mut self, cap: Decimal) -> Self {
        self.base_cap = Some(cap);
        self
    }

    pub fn with_monthly_threshold(mut self, threshold: Decimal) -> Self {
        self.monthly_threshold = Some(threshold);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A municipal ISS rate entry. The clinic carries one default-flagged entry
/// used when no city/state-specific row exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssMunicipalRate {
    pub clinic_id: String,
    pub city: String,
    pub state: String,
    pub rate: Decimal,
    pub is_default: bool,
}
