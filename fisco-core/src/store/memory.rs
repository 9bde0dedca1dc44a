//! In-memory store, used by tests and by deployments that load their
//! configuration at startup.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::models::{FiscalProfile, IssMunicipalRate, TaxRateConfiguration};

use super::repository::{StoreError, TaxConfigStore};

#[derive(Default)]
struct Inner {
    configurations: HashMap<String, Vec<TaxRateConfiguration>>,
    municipal_rates: HashMap<String, Vec<IssMunicipalRate>>,
    profiles: HashMap<String, FiscalProfile>,
}

/// A [`TaxConfigStore`] backed by process memory.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a clinic's configurations only if it has none yet. Returns
    /// whether the seed was applied. The check and the insert happen under
    /// one write lock, so concurrent seeders cannot double-insert.
    pub fn seed_if_empty(
        &self,
        clinic_id: &str,
        configurations: Vec<TaxRateConfiguration>,
        municipal_rates: Vec<IssMunicipalRate>,
    ) -> Result<bool, StoreError> {
        let mut inner = self.write()?;
        if inner
            .configurations
            .get(clinic_id)
            .is_some_and(|existing| !existing.is_empty())
        {
            return Ok(false);
        }
        inner
            .configurations
            .insert(clinic_id.to_string(), configurations);
        inner
            .municipal_rates
            .insert(clinic_id.to_string(), municipal_rates);
        Ok(true)
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>, StoreError> {
        self.inner
            .read()
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Inner>, StoreError> {
        self.inner
            .write()
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}

#[async_trait]
impl TaxConfigStore for MemoryStore {
    async fn fetch_configurations(
        &self,
        clinic_id: &str,
    ) -> Result<Vec<TaxRateConfiguration>, StoreError> {
        Ok(self
            .read()?
            .configurations
            .get(clinic_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn resolve_municipal_rate(
        &self,
        clinic_id: &str,
        city: Option<&str>,
        state: Option<&str>,
    ) -> Result<Option<Decimal>, StoreError> {
        let inner = self.read()?;
        let Some(rates) = inner.municipal_rates.get(clinic_id) else {
            return Ok(None);
        };

        if let (Some(city), Some(state)) = (city, state) {
            let matched = rates.iter().find(|r| {
                r.city.eq_ignore_ascii_case(city) && r.state.eq_ignore_ascii_case(state)
            });
            if let Some(rate) = matched {
                return Ok(Some(rate.rate));
            }
        }
        Ok(rates.iter().find(|r| r.is_default).map(|r| r.rate))
    }

    async fn fetch_profile(&self, clinic_id: &str) -> Result<FiscalProfile, StoreError> {
        self.read()?
            .profiles
            .get(clinic_id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn save_configuration(
        &self,
        configuration: TaxRateConfiguration,
    ) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        let entries = inner
            .configurations
            .entry(configuration.clinic_id.clone())
            .or_default();
        // Same (regime, tax_type, effective_from) replaces in place.
        match entries.iter_mut().find(|c| {
            c.regime == configuration.regime
                && c.tax_type == configuration.tax_type
                && c.effective_from == configuration.effective_from
        }) {
            Some(existing) => *existing = configuration,
            None => entries.push(configuration),
        }
        Ok(())
    }

    async fn save_municipal_rate(&self, rate: IssMunicipalRate) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        let entries = inner
            .municipal_rates
            .entry(rate.clinic_id.clone())
            .or_default();
        match entries
            .iter_mut()
            .find(|r| r.city == rate.city && r.state == rate.state)
        {
            Some(existing) => *existing = rate,
            None => entries.push(rate),
        }
        Ok(())
    }

    async fn save_profile(&self, profile: FiscalProfile) -> Result<(), StoreError> {
        self.write()?
            .profiles
            .insert(profile.clinic_id.clone(), profile);
        Ok(())
    }
}
