//! Jurisdiction default rate tables and seeding.
//!
//! A brand-new clinic starts from these tables; the configuration store owns
//! them afterwards and the clinic may edit every value. Rates reflect the
//! Brazilian federal tables for clinic services plus a generic 5% ISS; the
//! municipal rate table is expected to refine ISS per city.

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use fisco_core::models::{
    IssMunicipalRate, TaxRateBracket, TaxRateConfiguration, TaxRegime, TaxType,
};
use fisco_core::store::{MemoryStore, StoreError};

/// First day the default tables apply.
///
/// Seeding always stamps this date, so a clinic's later edits (stamped with
/// their own dates) shadow the defaults without deleting them.
pub fn default_effective_from() -> NaiveDate {
    // 2026-01-01 is always a valid date.
    NaiveDate::from_ymd_opt(2026, 1, 1).unwrap_or_default()
}

/// The full default configuration set for one clinic: every `(regime,
/// tax_type)` pair the four regime calculators require.
pub fn default_configurations(clinic_id: &str) -> Vec<TaxRateConfiguration> {
    let from = default_effective_from();
    let mut configs = Vec::with_capacity(17);

    // PF Carne-Leao. The IRPF table is the annual equivalent of the monthly
    // progressive table; callers doing month-by-month assessment should
    // configure the monthly table instead.
    configs.push(
        TaxRateConfiguration::progressive(
            clinic_id,
            TaxRegime::PfCarneLeao,
            TaxType::Irpf,
            vec![
                bracket(1, dec!(0), Some(dec!(60000)), dec!(0), dec!(0)),
                bracket(2, dec!(60000), Some(dec!(88200)), dec!(0.15), dec!(9000)),
                bracket(3, dec!(88200), None, dec!(0.275), dec!(10904.76)),
            ],
            from,
        )
        .with_description("Tabela progressiva anual do IRPF"),
    );
    configs.push(
        TaxRateConfiguration::flat(clinic_id, TaxRegime::PfCarneLeao, TaxType::Inss, dec!(0.20), from)
            .with_base_cap(dec!(97888.92))
            .with_description("INSS contribuinte individual, base anual limitada ao teto"),
    );
    configs.push(
        TaxRateConfiguration::flat(clinic_id, TaxRegime::PfCarneLeao, TaxType::Iss, dec!(0.05), from)
            .with_description("ISS sobre servicos de saude"),
    );

    // Simples Nacional, Anexo III (Fator R >= 28%).
    configs.push(
        TaxRateConfiguration::progressive(
            clinic_id,
            TaxRegime::Simples,
            TaxType::Das,
            vec![
                bracket(1, dec!(0), Some(dec!(180000)), dec!(0.06), dec!(0)),
                bracket(2, dec!(180000), Some(dec!(360000)), dec!(0.112), dec!(9360)),
                bracket(3, dec!(360000), Some(dec!(720000)), dec!(0.135), dec!(17640)),
                bracket(4, dec!(720000), Some(dec!(1800000)), dec!(0.16), dec!(35640)),
                bracket(5, dec!(1800000), Some(dec!(3600000)), dec!(0.21), dec!(125640)),
                bracket(6, dec!(3600000), None, dec!(0.33), dec!(648000)),
            ],
            from,
        )
        .with_description("Simples Nacional Anexo III"),
    );

    // Simples Nacional, Anexo V (Fator R < 28%).
    configs.push(
        TaxRateConfiguration::progressive(
            clinic_id,
            TaxRegime::Simples,
            TaxType::DasAnexoV,
            vec![
                bracket(1, dec!(0), Some(dec!(180000)), dec!(0.155), dec!(0)),
                bracket(2, dec!(180000), Some(dec!(360000)), dec!(0.18), dec!(4500)),
                bracket(3, dec!(360000), Some(dec!(720000)), dec!(0.195), dec!(9900)),
                bracket(4, dec!(720000), Some(dec!(1800000)), dec!(0.205), dec!(17100)),
                bracket(5, dec!(1800000), Some(dec!(3600000)), dec!(0.23), dec!(62100)),
                bracket(6, dec!(3600000), None, dec!(0.305), dec!(540000)),
            ],
            from,
        )
        .with_description("Simples Nacional Anexo V"),
    );

    // Lucro Presumido: IRPJ/CSLL on the 32% presumed service margin, PIS and
    // COFINS cumulative, ISS municipal.
    configs.push(
        TaxRateConfiguration::flat(clinic_id, TaxRegime::LucroPresumido, TaxType::Irpj, dec!(0.048), from)
            .with_presumption_rate(dec!(0.32))
            .with_description("IRPJ sobre base presumida"),
    );
    configs.push(
        TaxRateConfiguration::flat(
            clinic_id,
            TaxRegime::LucroPresumido,
            TaxType::IrpjAdicional,
            dec!(0.10),
            from,
        )
        .with_presumption_rate(dec!(0.32))
        .with_monthly_threshold(dec!(20000))
        .with_description("Adicional de IRPJ sobre o excedente"),
    );
    configs.push(
        TaxRateConfiguration::flat(clinic_id, TaxRegime::LucroPresumido, TaxType::Csll, dec!(0.0288), from)
            .with_presumption_rate(dec!(0.32))
            .with_description("CSLL sobre base presumida"),
    );
    configs.push(
        TaxRateConfiguration::flat(clinic_id, TaxRegime::LucroPresumido, TaxType::Pis, dec!(0.0065), from)
            .with_description("PIS cumulativo"),
    );
    configs.push(
        TaxRateConfiguration::flat(clinic_id, TaxRegime::LucroPresumido, TaxType::Cofins, dec!(0.03), from)
            .with_description("COFINS cumulativo"),
    );
    configs.push(
        TaxRateConfiguration::flat(clinic_id, TaxRegime::LucroPresumido, TaxType::Iss, dec!(0.05), from)
            .with_description("ISS sobre servicos de saude"),
    );

    // Lucro Real: profit taxes on the assessed profit, PIS and COFINS
    // non-cumulative, ISS municipal.
    configs.push(
        TaxRateConfiguration::flat(clinic_id, TaxRegime::LucroReal, TaxType::Irpj, dec!(0.15), from)
            .with_description("IRPJ sobre o lucro real"),
    );
    configs.push(
        TaxRateConfiguration::flat(
            clinic_id,
            TaxRegime::LucroReal,
            TaxType::IrpjAdicional,
            dec!(0.10),
            from,
        )
        .with_monthly_threshold(dec!(20000))
        .with_description("Adicional de IRPJ sobre o excedente"),
    );
    configs.push(
        TaxRateConfiguration::flat(clinic_id, TaxRegime::LucroReal, TaxType::Csll, dec!(0.09), from)
            .with_description("CSLL sobre o lucro real"),
    );
    configs.push(
        TaxRateConfiguration::flat(clinic_id, TaxRegime::LucroReal, TaxType::Pis, dec!(0.0165), from)
            .with_description("PIS nao-cumulativo"),
    );
    configs.push(
        TaxRateConfiguration::flat(clinic_id, TaxRegime::LucroReal, TaxType::Cofins, dec!(0.076), from)
            .with_description("COFINS nao-cumulativo"),
    );
    configs.push(
        TaxRateConfiguration::flat(clinic_id, TaxRegime::LucroReal, TaxType::Iss, dec!(0.05), from)
            .with_description("ISS sobre servicos de saude"),
    );

    configs
}

/// The default municipal ISS entry: a single default-flagged 5% rate.
pub fn default_municipal_rates(clinic_id: &str) -> Vec<IssMunicipalRate> {
    vec![IssMunicipalRate {
        clinic_id: clinic_id.to_string(),
        city: String::new(),
        state: String::new(),
        rate: dec!(0.05),
        is_default: true,
    }]
}

/// Seeds the default tables for a clinic that has none. Idempotent; returns
/// whether the seed was applied.
///
/// # Errors
///
/// [`StoreError`] when the store rejects the write.
pub fn seed_defaults(store: &MemoryStore, clinic_id: &str) -> Result<bool, StoreError> {
    store.seed_if_empty(
        clinic_id,
        default_configurations(clinic_id),
        default_municipal_rates(clinic_id),
    )
}

fn bracket(
    order: u32,
    min_value: rust_decimal::Decimal,
    max_value: Option<rust_decimal::Decimal>,
    rate: rust_decimal::Decimal,
    deduction: rust_decimal::Decimal,
) -> TaxRateBracket {
    TaxRateBracket {
        order,
        min_value,
        max_value,
        rate,
        deduction,
    }
}
