//! Persisted storage settings record

use crate::errors::StoreError;
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    // S3-compatible bucket naming: 3-63 chars, lowercase alnum, dots and hyphens,
    // starting and ending with a letter or digit
    static ref BUCKET_NAME: Regex = Regex::new(r"^[a-z0-9][a-z0-9.-]{1,61}[a-z0-9]$").unwrap();
    static ref REGION: Regex = Regex::new(r"^[a-z]{2}(-[a-z0-9]+)+$").unwrap();
}

/// Settings record written by the settings-save flow and read by the probe core
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageSettings {
    pub provider: String,
    pub bucket_name: String,
    pub region: String,
    /// Explicit storage host, overriding the configured endpoint template
    pub endpoint_host: Option<String>,
    pub public_base_url: Option<String>,
    pub max_upload_mb: u32,
    pub updated_at: Option<DateTime<Utc>>,
}

impl StorageSettings {
    pub fn new(bucket_name: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            provider: "wasabi".to_string(),
            bucket_name: bucket_name.into(),
            region: region.into(),
            endpoint_host: None,
            public_base_url: None,
            max_upload_mb: 100,
            updated_at: None,
        }
    }

    /// Reject records the store should never see
    pub fn validate(&self) -> Result<(), StoreError> {
        if !BUCKET_NAME.is_match(&self.bucket_name) || self.bucket_name.contains("..") {
            return Err(StoreError::Validation(format!(
                "invalid bucket name '{}'",
                self.bucket_name
            )));
        }
        if !REGION.is_match(&self.region) {
            return Err(StoreError::Validation(format!(
                "invalid region '{}'",
                self.region
            )));
        }
        if self.max_upload_mb == 0 {
            return Err(StoreError::Validation(
                "max upload size must be positive".to_string(),
            ));
        }
        if let Some(host) = &self.endpoint_host {
            if host.trim().is_empty() || host.contains("://") || host.contains('/') {
                return Err(StoreError::Validation(format!(
                    "endpoint host '{}' must be a bare host name",
                    host
                )));
            }
        }
        Ok(())
    }
}
