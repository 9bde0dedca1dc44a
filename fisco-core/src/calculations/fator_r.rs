//! Fator R resolution for Simples Nacional.
//!
//! The Fator R is the ratio of annualized payroll to trailing-12-month gross
//! revenue. At or above 28% the clinic is taxed under Anexo III; below it,
//! under the costlier Anexo V. This is the one place regime selection depends
//! on a computed ratio rather than a stored flag.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{FatorRMode, FiscalProfile, SimplesAnexo};

/// Annex III applies at `fator_r >= 0.28`.
pub const FATOR_R_THRESHOLD: Decimal = Decimal::from_parts(28, 0, 0, false, 2);

/// Caller's choice of annex selection, derived from the fiscal profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FatorRSelection {
    /// Use the profile's chosen annex verbatim.
    Manual(SimplesAnexo),
    /// Derive the annex from payroll over RBT12.
    Auto { monthly_payroll: Decimal },
}

impl FatorRSelection {
    /// Reads the selection off a fiscal profile.
    pub fn from_profile(profile: &FiscalProfile) -> Self {
        match profile.simples_fator_r_mode {
            FatorRMode::Manual => Self::Manual(profile.simples_anexo),
            FatorRMode::Auto => Self::Auto {
                monthly_payroll: profile.simples_monthly_payroll,
            },
        }
    }
}

/// Outcome of annex resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FatorRResolution {
    pub anexo: SimplesAnexo,
    /// The computed ratio; `None` in manual mode.
    pub fator_r: Option<Decimal>,
}

/// Resolves which annex applies.
///
/// Auto mode computes `fator_r = monthly_payroll * 12 / rbt12`; an RBT12 of
/// zero yields a ratio of zero, which selects Anexo V, the higher-tax default
/// for a clinic with no revenue history.
pub fn resolve_anexo(selection: FatorRSelection, rbt12: Decimal) -> FatorRResolution {
    match selection {
        FatorRSelection::Manual(anexo) => FatorRResolution {
            anexo,
            fator_r: None,
        },
        FatorRSelection::Auto { monthly_payroll } => {
            let fator_r = if rbt12 > Decimal::ZERO {
                monthly_payroll * Decimal::from(12) / rbt12
            } else {
                Decimal::ZERO
            };
            let anexo = if fator_r >= FATOR_R_THRESHOLD {
                SimplesAnexo::AnexoIii
            } else {
                SimplesAnexo::AnexoV
            };
            FatorRResolution {
                anexo,
                fator_r: Some(fator_r),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn manual_mode_uses_the_profile_annex_verbatim() {
        let resolution = resolve_anexo(
            FatorRSelection::Manual(SimplesAnexo::AnexoIii),
            dec!(0), // an empty RBT12 must not override the manual choice
        );

        assert_eq!(resolution.anexo, SimplesAnexo::AnexoIii);
        assert_eq!(resolution.fator_r, None);
    }

    #[test]
    fn ratio_just_below_threshold_selects_anexo_v() {
        // 23333.33 * 12 / 1_000_000 = 0.27999996, strictly below 0.28.
        let resolution = resolve_anexo(
            FatorRSelection::Auto {
                monthly_payroll: dec!(23333.33),
            },
            dec!(1000000),
        );

        assert_eq!(resolution.anexo, SimplesAnexo::AnexoV);
        assert_eq!(resolution.fator_r, Some(dec!(0.27999996)));
    }

    #[test]
    fn ratio_at_threshold_selects_anexo_iii() {
        // 23333.34 * 12 / 1_000_000 = 0.28000008, at/above 0.28.
        let resolution = resolve_anexo(
            FatorRSelection::Auto {
                monthly_payroll: dec!(23333.34),
            },
            dec!(1000000),
        );

        assert_eq!(resolution.anexo, SimplesAnexo::AnexoIii);
    }

    #[test]
    fn exact_threshold_selects_anexo_iii() {
        // 28000 * 12 / 1_200_000 = 0.28 exactly.
        let resolution = resolve_anexo(
            FatorRSelection::Auto {
                monthly_payroll: dec!(28000),
            },
            dec!(1200000),
        );

        assert_eq!(resolution.anexo, SimplesAnexo::AnexoIii);
        assert_eq!(resolution.fator_r, Some(dec!(0.28)));
    }

    #[test]
    fn zero_rbt12_defaults_to_anexo_v() {
        let resolution = resolve_anexo(
            FatorRSelection::Auto {
                monthly_payroll: dec!(50000),
            },
            dec!(0),
        );

        assert_eq!(resolution.anexo, SimplesAnexo::AnexoV);
        assert_eq!(resolution.fator_r, Some(dec!(0)));
    }

    #[test]
    fn selection_reads_profile_mode() {
        let profile = FiscalProfile {
            clinic_id: "clinic-1".to_string(),
            pf_enabled: false,
            pf_uses_carne_leao: false,
            pf_city: None,
            pf_state: None,
            pj_enabled: true,
            pj_regime: Some(crate::models::TaxRegime::Simples),
            simples_fator_r_mode: FatorRMode::Auto,
            simples_anexo: SimplesAnexo::AnexoIii,
            simples_monthly_payroll: dec!(10000),
        };

        assert_eq!(
            FatorRSelection::from_profile(&profile),
            FatorRSelection::Auto {
                monthly_payroll: dec!(10000)
            }
        );
    }
}
