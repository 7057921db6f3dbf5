//! Settings store behind a PostgREST-style REST data API.
//!
//! The API caches its view of the database schema. Right after a migration
//! it can answer `PGRST204`/`PGRST205` (unknown column / table) or a message
//! mentioning the schema cache until it reloads; those responses map to
//! [`StoreError::SchemaCacheTransient`] so the settings service can retry.

use super::ConfigStore;
use crate::config::ProbeConfig;
use crate::errors::{AppResult, StoreError, StoreResult};
use crate::types::StorageSettings;
use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use futures::FutureExt;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

lazy_static! {
    static ref SCHEMA_CACHE_MESSAGE: Regex = Regex::new(r"(?i)schema\s+cache").unwrap();
}

const SCHEMA_CACHE_CODES: &[&str] = &["PGRST204", "PGRST205"];

/// Row shape of the settings table
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SettingsRow {
    id: i64,
    provider: String,
    bucket_name: String,
    region: String,
    endpoint_host: Option<String>,
    public_base_url: Option<String>,
    max_upload_mb: u32,
    updated_at: Option<DateTime<Utc>>,
}

impl From<&StorageSettings> for SettingsRow {
    fn from(settings: &StorageSettings) -> Self {
        Self {
            id: 1,
            provider: settings.provider.clone(),
            bucket_name: settings.bucket_name.clone(),
            region: settings.region.clone(),
            endpoint_host: settings.endpoint_host.clone(),
            public_base_url: settings.public_base_url.clone(),
            max_upload_mb: settings.max_upload_mb,
            updated_at: settings.updated_at,
        }
    }
}

impl From<SettingsRow> for StorageSettings {
    fn from(row: SettingsRow) -> Self {
        Self {
            provider: row.provider,
            bucket_name: row.bucket_name,
            region: row.region,
            endpoint_host: row.endpoint_host,
            public_base_url: row.public_base_url,
            max_upload_mb: row.max_upload_mb,
            updated_at: row.updated_at,
        }
    }
}

/// Error body returned by the data API
#[derive(Debug, Default, Deserialize)]
struct RestErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Map a failed REST response onto the store error taxonomy
pub fn classify_rest_error(operation: &str, status: StatusCode, body: &str) -> StoreError {
    let parsed: RestErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .message
        .clone()
        .unwrap_or_else(|| format!("HTTP {}: {}", status.as_u16(), body.trim()));

    let code_is_transient = parsed
        .code
        .as_deref()
        .map(|code| SCHEMA_CACHE_CODES.contains(&code))
        .unwrap_or(false);

    if code_is_transient || SCHEMA_CACHE_MESSAGE.is_match(&message) {
        StoreError::SchemaCacheTransient(message)
    } else {
        StoreError::CallFailed {
            operation: operation.to_string(),
            message,
        }
    }
}

pub struct RestConfigStore {
    client: Client,
    table_url: String,
    api_key: Option<String>,
}

impl RestConfigStore {
    pub fn new(
        base_url: &str,
        table: &str,
        api_key: Option<String>,
        probe: &ProbeConfig,
    ) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(probe.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            table_url: format!("{}/rest/v1/{}", base_url.trim_end_matches('/'), table),
            api_key,
        })
    }

    fn authorise(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("apikey", key).bearer_auth(key),
            None => request,
        }
    }

    async fn send(&self, operation: &str, request: RequestBuilder) -> StoreResult<String> {
        let response = self
            .authorise(request)
            .send()
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        if status.is_success() {
            Ok(body)
        } else {
            let error = classify_rest_error(operation, status, &body);
            warn!("Settings {} failed: {}", operation, error);
            Err(error)
        }
    }

    async fn fetch(&self) -> StoreResult<StorageSettings> {
        let request = self
            .client
            .get(&self.table_url)
            .query(&[("select", "*"), ("id", "eq.1"), ("limit", "1")]);
        let body = self.send("read settings", request).await?;

        let rows: Vec<SettingsRow> =
            serde_json::from_str(&body).map_err(|e| StoreError::CallFailed {
                operation: "read settings".to_string(),
                message: format!("unexpected response body: {}", e),
            })?;

        rows.into_iter()
            .next()
            .map(StorageSettings::from)
            .ok_or(StoreError::NotFound)
    }

    async fn upsert(&self, settings: &StorageSettings) -> StoreResult<()> {
        let request = self
            .client
            .post(&self.table_url)
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&[SettingsRow::from(settings)]);
        self.send("save settings", request).await?;
        debug!("Upserted settings row for bucket {}", settings.bucket_name);
        Ok(())
    }
}

impl ConfigStore for RestConfigStore {
    fn get(&self) -> BoxFuture<'_, StoreResult<StorageSettings>> {
        self.fetch().boxed()
    }

    fn set<'a>(&'a self, settings: &'a StorageSettings) -> BoxFuture<'a, StoreResult<()>> {
        self.upsert(settings).boxed()
    }
}
