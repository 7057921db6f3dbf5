//! Settings-save flow
//!
//! Validation and the `updated_at` stamp happen once; only the store write is
//! re-issued by the retry policy.

use super::ConfigStore;
use crate::errors::{StoreError, StoreResult};
use crate::probe::RetryPolicy;
use crate::types::StorageSettings;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

pub struct SettingsService {
    store: Arc<dyn ConfigStore>,
    retry: RetryPolicy,
}

impl SettingsService {
    pub fn new(store: Arc<dyn ConfigStore>, retry: RetryPolicy) -> Self {
        Self { store, retry }
    }

    /// Current settings, `None` before the first save
    pub async fn load(&self) -> StoreResult<Option<StorageSettings>> {
        match self.store.get().await {
            Ok(settings) => Ok(Some(settings)),
            Err(StoreError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Validate, stamp and persist; returns the record as written
    pub async fn save(&self, mut settings: StorageSettings) -> StoreResult<StorageSettings> {
        settings.validate()?;
        settings.updated_at = Some(Utc::now());

        self.retry
            .run("save settings", || self.store.set(&settings))
            .await?;

        info!(
            "Saved storage settings: bucket={} region={}",
            settings.bucket_name, settings.region
        );
        Ok(settings)
    }
}
