//! One calculator per fiscal regime.
//!
//! All four share the same shape: a fixed, ordered pipeline over one
//! [`TaxCalculationInput`](crate::models::TaxCalculationInput). For each
//! required tax type, fetch its configuration from the snapshot, compute via
//! the progressive or flat calculator and append a breakdown item.

pub mod carne_leao;
pub mod lucro_presumido;
pub mod lucro_real;
pub mod simples;

pub use carne_leao::CarneLeaoCalculator;
pub use lucro_presumido::LucroPresumidoCalculator;
pub use lucro_real::LucroRealCalculator;
pub use simples::SimplesCalculator;

/// Appends the misconfigured-rate warning to an item's notes when the
/// calculator flagged a rate outside [0, 1].
pub(crate) fn with_degenerate_note(notes: Option<String>, degenerate: bool) -> Option<String> {
    if !degenerate {
        return notes;
    }
    let warning = "Atencao: aliquota configurada fora do intervalo 0-100%";
    Some(match notes {
        Some(existing) => format!("{existing}. {warning}"),
        None => warning.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::with_degenerate_note;

    #[test]
    fn note_untouched_when_rate_is_sane() {
        assert_eq!(with_degenerate_note(None, false), None);
        assert_eq!(
            with_degenerate_note(Some("x".to_string()), false),
            Some("x".to_string())
        );
    }

    #[test]
    fn warning_appended_after_existing_note() {
        let note = with_degenerate_note(Some("Regime cumulativo".to_string()), true).unwrap();
        assert!(note.starts_with("Regime cumulativo. "));
        assert!(note.contains("fora do intervalo"));
    }
}
