use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Annual (or rolling-period) aggregates supplied by the caller.
///
/// The engine never derives these from transactions; the ledger layer
/// aggregates and the engine only computes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxCalculationInput {
    /// Gross income received as an individual (receita bruta PF).
    pub pf_gross_income: Decimal,
    /// Gross revenue of the corporate entity (receita bruta PJ).
    pub pj_gross_income: Decimal,
    /// Livro-caixa deductible expenses for the Carnê-Leão base.
    pub pf_deductible_expenses: Decimal,
    /// IRRF withheld at source over the period. Used only when no monthly
    /// inputs are supplied.
    pub irrf_withheld: Decimal,
    /// Trailing-12-month gross revenue, the Simples bracket lookup base.
    pub rbt12: Decimal,
    /// Number of months covered by the aggregates, normally 12. Scales the
    /// IRPJ Adicional threshold.
    pub months_in_period: i32,

    /// Actual accounting profit for Lucro Real. When absent, derived as
    /// `pj_gross_income - pj_deductible_expenses`.
    pub real_profit: Option<Decimal>,
    /// Operating expenses backing the derived Lucro Real profit.
    pub pj_deductible_expenses: Option<Decimal>,
}

impl TaxCalculationInput {
    /// A zeroed input for a standard 12-month period.
    pub fn empty() -> Self {
        Self {
            pf_gross_income: Decimal::ZERO,
            pj_gross_income: Decimal::ZERO,
            pf_deductible_expenses: Decimal::ZERO,
            irrf_withheld: Decimal::ZERO,
            rbt12: Decimal::ZERO,
            months_in_period: 12,
            real_profit: None,
            pj_deductible_expenses: None,
        }
    }
}

/// One calendar month's aggregates, for the month-by-month IRPF path and the
/// IRRF sum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyTaxInput {
    pub month: u32,
    pub month_name: String,
    pub pf_income: Decimal,
    pub pj_income: Decimal,
    pub deductible_expenses: Decimal,
    pub irrf_withheld: Decimal,
}
