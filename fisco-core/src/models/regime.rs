use std::fmt;

use serde::{Deserialize, Serialize};

/// Fiscal regimes supported by the engine.
///
/// `PfCarneLeao` is the individual (pessoa física) regime; the other three are
/// corporate (pessoa jurídica) regimes, of which a clinic elects exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxRegime {
    PfCarneLeao,
    Simples,
    LucroPresumido,
    LucroReal,
}

impl TaxRegime {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PfCarneLeao => "pf_carne_leao",
            Self::Simples => "simples",
            Self::LucroPresumido => "lucro_presumido",
            Self::LucroReal => "lucro_real",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pf_carne_leao" => Some(Self::PfCarneLeao),
            "simples" => Some(Self::Simples),
            "lucro_presumido" => Some(Self::LucroPresumido),
            "lucro_real" => Some(Self::LucroReal),
            _ => None,
        }
    }

    /// Display label used on breakdown results.
    pub fn label(&self) -> &'static str {
        match self {
            Self::PfCarneLeao => "Pessoa Física - Carnê-Leão",
            Self::Simples => "Simples Nacional",
            Self::LucroPresumido => "Lucro Presumido",
            Self::LucroReal => "Lucro Real",
        }
    }

    /// Whether this regime applies to the corporate (PJ) side.
    pub fn is_corporate(&self) -> bool {
        !matches!(self, Self::PfCarneLeao)
    }

    /// Tax types this regime's pipeline computes, in breakdown order.
    pub fn applicable_tax_types(&self) -> &'static [TaxType] {
        match self {
            Self::PfCarneLeao => &[TaxType::Irpf, TaxType::Inss, TaxType::Iss],
            Self::Simples => &[TaxType::Das, TaxType::DasAnexoV],
            Self::LucroPresumido | Self::LucroReal => &[
                TaxType::Irpj,
                TaxType::IrpjAdicional,
                TaxType::Csll,
                TaxType::Pis,
                TaxType::Cofins,
                TaxType::Iss,
            ],
        }
    }
}

impl fmt::Display for TaxRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Individual taxes the regimes compute.
///
/// `Das` and `DasAnexoV` are the Simples Nacional consolidated payment keyed
/// by annex; which one applies is decided by the Fator R resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxType {
    Irpf,
    Irpj,
    IrpjAdicional,
    Csll,
    Pis,
    Cofins,
    Iss,
    Das,
    DasAnexoV,
    Inss,
}

impl TaxType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Irpf => "irpf",
            Self::Irpj => "irpj",
            Self::IrpjAdicional => "irpj_adicional",
            Self::Csll => "csll",
            Self::Pis => "pis",
            Self::Cofins => "cofins",
            Self::Iss => "iss",
            Self::Das => "das",
            Self::DasAnexoV => "das_anexo_v",
            Self::Inss => "inss",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "irpf" => Some(Self::Irpf),
            "irpj" => Some(Self::Irpj),
            "irpj_adicional" => Some(Self::IrpjAdicional),
            "csll" => Some(Self::Csll),
            "pis" => Some(Self::Pis),
            "cofins" => Some(Self::Cofins),
            "iss" => Some(Self::Iss),
            "das" => Some(Self::Das),
            "das_anexo_v" => Some(Self::DasAnexoV),
            "inss" => Some(Self::Inss),
            _ => None,
        }
    }

    /// Display label used on breakdown items.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Irpf => "IRPF",
            Self::Irpj => "IRPJ",
            Self::IrpjAdicional => "IRPJ Adicional",
            Self::Csll => "CSLL",
            Self::Pis => "PIS",
            Self::Cofins => "COFINS",
            Self::Iss => "ISS",
            Self::Das => "DAS Anexo III",
            Self::DasAnexoV => "DAS Anexo V",
            Self::Inss => "INSS",
        }
    }
}

impl fmt::Display for TaxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a configuration expresses its rate: one flat rate, or an ordered
/// bracket table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateType {
    Flat,
    Progressive,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn regime_as_str_parse_round_trips() {
        for regime in [
            TaxRegime::PfCarneLeao,
            TaxRegime::Simples,
            TaxRegime::LucroPresumido,
            TaxRegime::LucroReal,
        ] {
            assert_eq!(TaxRegime::parse(regime.as_str()), Some(regime));
        }
    }

    #[test]
    fn regime_parse_rejects_unknown() {
        assert_eq!(TaxRegime::parse("mei"), None);
    }

    #[test]
    fn tax_type_as_str_parse_round_trips() {
        for tax_type in [
            TaxType::Irpf,
            TaxType::Irpj,
            TaxType::IrpjAdicional,
            TaxType::Csll,
            TaxType::Pis,
            TaxType::Cofins,
            TaxType::Iss,
            TaxType::Das,
            TaxType::DasAnexoV,
            TaxType::Inss,
        ] {
            assert_eq!(TaxType::parse(tax_type.as_str()), Some(tax_type));
        }
    }

    #[test]
    fn only_carne_leao_is_individual() {
        assert!(!TaxRegime::PfCarneLeao.is_corporate());
        assert!(TaxRegime::Simples.is_corporate());
        assert!(TaxRegime::LucroPresumido.is_corporate());
        assert!(TaxRegime::LucroReal.is_corporate());
    }

    #[test]
    fn corporate_profit_regimes_share_tax_type_list() {
        assert_eq!(
            TaxRegime::LucroPresumido.applicable_tax_types(),
            TaxRegime::LucroReal.applicable_tax_types(),
        );
        assert_eq!(TaxRegime::LucroReal.applicable_tax_types().len(), 6);
    }
}
