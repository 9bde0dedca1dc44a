mod fiscal_profile;
mod input;
mod rate_configuration;
mod regime;
mod result;

pub use fiscal_profile::{FatorRMode, FiscalProfile, SimplesAnexo};
pub use input::{MonthlyTaxInput, TaxCalculationInput};
pub use rate_configuration::{IssMunicipalRate, TaxRateBracket, TaxRateConfiguration};
pub use regime::{RateType, TaxRegime, TaxType};
pub use result::{MonthlyTaxBreakdown, TaxBreakdownItem, TaxCalculationResult, format_tax_rate};
