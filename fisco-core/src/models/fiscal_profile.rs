use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::TaxRegime;

/// How the Simples Nacional annex is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FatorRMode {
    /// Derive the annex from payroll over RBT12.
    Auto,
    /// Use the annex stored on the profile verbatim.
    Manual,
}

/// The two Simples Nacional service annexes selectable via Fator R.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimplesAnexo {
    AnexoIii,
    AnexoV,
}

impl SimplesAnexo {
    /// The tax-type key whose bracket table this annex uses.
    pub fn das_tax_type(&self) -> crate::models::TaxType {
        match self {
            Self::AnexoIii => crate::models::TaxType::Das,
            Self::AnexoV => crate::models::TaxType::DasAnexoV,
        }
    }
}

/// Engine-relevant slice of a clinic's fiscal profile.
///
/// Identification fields (CPF/CNPJ, addresses, CNAE) stay with the external
/// profile store; the engine only needs the flags that gate each side of the
/// calculation and the Simples annex selection inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalProfile {
    pub clinic_id: String,

    pub pf_enabled: bool,
    pub pf_uses_carne_leao: bool,
    pub pf_city: Option<String>,
    pub pf_state: Option<String>,

    pub pj_enabled: bool,
    pub pj_regime: Option<TaxRegime>,

    pub simples_fator_r_mode: FatorRMode,
    pub simples_anexo: SimplesAnexo,
    pub simples_monthly_payroll: Decimal,
}
