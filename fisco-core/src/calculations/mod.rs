pub mod common;
pub mod error;
pub mod fator_r;
pub mod flat;
pub mod progressive;
pub mod regimes;
pub mod snapshot;
pub mod summary;

pub use error::{CalculationError, InputError};
pub use fator_r::{FATOR_R_THRESHOLD, FatorRResolution, FatorRSelection, resolve_anexo};
pub use regimes::{
    CarneLeaoCalculator, LucroPresumidoCalculator, LucroRealCalculator, SimplesCalculator,
};
pub use snapshot::ConfigSnapshot;
pub use summary::{CalculateTaxesOptions, TaxEngine, TaxSummary};
