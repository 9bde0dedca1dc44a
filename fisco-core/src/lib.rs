pub mod calculations;
pub mod models;
pub mod store;

pub use calculations::{CalculationError, ConfigSnapshot, InputError, TaxEngine, TaxSummary};
pub use store::{MemoryStore, StoreError, TaxConfigStore};
pub use models::*;
