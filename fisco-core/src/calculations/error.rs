use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{TaxRegime, TaxType};

/// Configuration-class failures raised while computing one regime.
///
/// These are not retried: the configuration store is user-editable, so the
/// caller surfaces them as "complete your fiscal setup" prompts. The
/// aggregator records them per side instead of failing the whole summary,
/// which is why they are serializable and cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum CalculationError {
    /// No active configuration exists for a `(regime, tax_type)` the regime's
    /// pipeline requires.
    #[error("no active configuration for {regime}/{tax_type}")]
    MissingConfiguration { regime: TaxRegime, tax_type: TaxType },

    /// A flat configuration carries no flat rate.
    #[error("configuration {regime}/{tax_type} has no flat rate")]
    MissingFlatRate { regime: TaxRegime, tax_type: TaxType },

    /// A surcharge configuration carries no monthly threshold.
    #[error("configuration {regime}/{tax_type} has no monthly threshold")]
    MissingSurchargeThreshold { regime: TaxRegime, tax_type: TaxType },

    /// A progressive configuration has an empty bracket table.
    #[error("configuration {regime}/{tax_type} has no brackets")]
    EmptyBrackets { regime: TaxRegime, tax_type: TaxType },

    /// The bracket table violates the contiguity/coverage invariant at the
    /// given bracket order.
    #[error("bracket table for {regime}/{tax_type} is invalid at order {order}: {reason}")]
    InvalidBrackets {
        regime: TaxRegime,
        tax_type: TaxType,
        order: u32,
        reason: String,
    },

    /// No bracket covers the base value. Cannot happen for a table that
    /// passed validation.
    #[error("no bracket of {regime}/{tax_type} matches base {base}")]
    NoMatchingBracket {
        regime: TaxRegime,
        tax_type: TaxType,
        base: Decimal,
    },

    /// The requested PJ regime is the individual regime.
    #[error("{0} is not a corporate regime")]
    NotACorporateRegime(TaxRegime),
}

/// Input validation failures. Rejected before any calculation begins; no
/// partial summary is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("{field} must not be negative, got {value}")]
    NegativeValue { field: &'static str, value: Decimal },

    #[error("months_in_period must be positive, got {0}")]
    InvalidMonthsInPeriod(i32),
}
