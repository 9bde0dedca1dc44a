use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{FiscalProfile, IssMunicipalRate, TaxRateConfiguration};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Record not found")]
    NotFound,

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Connection error: {0}")]
    Connection(String),
}

/// Read side of the configuration store the engine depends on.
///
/// Implementations back this with whatever persistence the deployment uses;
/// the engine only ever builds a snapshot from it.
#[async_trait]
pub trait TaxConfigStore: Send + Sync {
    /// All rate configurations for a clinic, active or not.
    async fn fetch_configurations(
        &self,
        clinic_id: &str,
    ) -> Result<Vec<TaxRateConfiguration>, StoreError>;

    /// The municipal ISS rate for the clinic's city/state, falling back to
    /// the clinic's default municipal rate when the city has no entry.
    /// `None` means no municipal override applies.
    async fn resolve_municipal_rate(
        &self,
        clinic_id: &str,
        city: Option<&str>,
        state: Option<&str>,
    ) -> Result<Option<Decimal>, StoreError>;

    /// The clinic's fiscal profile.
    async fn fetch_profile(&self, clinic_id: &str) -> Result<FiscalProfile, StoreError>;

    /// Upserts one rate configuration.
    async fn save_configuration(
        &self,
        configuration: TaxRateConfiguration,
    ) -> Result<(), StoreError>;

    /// Upserts one municipal ISS rate.
    async fn save_municipal_rate(&self, rate: IssMunicipalRate) -> Result<(), StoreError>;

    /// Upserts the clinic's fiscal profile.
    async fn save_profile(&self, profile: FiscalProfile) -> Result<(), StoreError>;
}
