//! External collaborators: the settings store and the object listing.
//!
//! The probe and analytics cores only see the [`ConfigStore`] and
//! [`ObjectLister`] traits. Concrete backends:
//!
//! - [`SqliteConfigStore`] - local settings file
//! - [`RestConfigStore`] - settings row behind a PostgREST-style data API
//! - [`HttpObjectLister`] - live listing from the backend `list` function
//! - [`CsvObjectLister`] - cached snapshot exported to CSV

pub mod listing;
pub mod rest;
pub mod service;
pub mod sqlite;

pub use listing::{CsvObjectLister, HttpObjectLister};
pub use rest::RestConfigStore;
pub use service::SettingsService;
pub use sqlite::SqliteConfigStore;

use crate::config::AppConfig;
use crate::errors::{AppResult, StoreResult};
use crate::types::{ObjectRecord, StorageSettings};
use futures::future::BoxFuture;
use std::sync::Arc;

/// Persisted storage settings
///
/// `set` surfaces [`crate::errors::StoreError::SchemaCacheTransient`] when the
/// store's schema view lags a just-applied change; callers retry that class only.
pub trait ConfigStore: Send + Sync {
    /// Current settings, or `StoreError::NotFound` before the first save
    fn get(&self) -> BoxFuture<'_, StoreResult<StorageSettings>>;

    fn set<'a>(&'a self, settings: &'a StorageSettings) -> BoxFuture<'a, StoreResult<()>>;
}

/// Source of raw object metadata, live or cached
pub trait ObjectLister: Send + Sync {
    fn list_objects(&self) -> BoxFuture<'_, AppResult<Vec<ObjectRecord>>>;
}

/// Settings store selected by configuration
pub fn open_config_store(config: &AppConfig) -> AppResult<Arc<dyn ConfigStore>> {
    match &config.database.rest_url {
        Some(url) => Ok(Arc::new(RestConfigStore::new(
            url,
            &config.database.settings_table,
            config.backend.api_key.clone(),
            &config.probe,
        )?)),
        None => Ok(Arc::new(SqliteConfigStore::open(
            &config.database.settings_path,
        )?)),
    }
}

/// Object lister selected by configuration; a snapshot file wins over the live listing
pub fn open_object_lister(config: &AppConfig) -> AppResult<Arc<dyn ObjectLister>> {
    match &config.analytics.snapshot_csv {
        Some(path) => Ok(Arc::new(CsvObjectLister::new(path))),
        None => Ok(Arc::new(HttpObjectLister::new(
            &config.backend,
            &config.probe,
        )?)),
    }
}
