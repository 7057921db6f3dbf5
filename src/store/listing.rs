//! Object metadata sources for the analytics refresh

use super::ObjectLister;
use crate::config::{BackendConfig, ProbeConfig};
use crate::errors::{AppError, AppResult};
use crate::types::ObjectRecord;
use chrono::{DateTime, Utc};
use csv::ReaderBuilder;
use futures::future::{self, BoxFuture};
use futures::FutureExt;
use reqwest::Client;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Response of the backend `list` function: a bare array or `{ "objects": [...] }`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListingBody {
    Records(Vec<ObjectRecord>),
    Wrapped { objects: Vec<ObjectRecord> },
}

impl ListingBody {
    fn into_records(self) -> Vec<ObjectRecord> {
        match self {
            ListingBody::Records(records) | ListingBody::Wrapped { objects: records } => records,
        }
    }
}

/// Live listing through the backend function host
pub struct HttpObjectLister {
    client: Client,
    url: String,
    api_key: Option<String>,
}

impl HttpObjectLister {
    pub fn new(backend: &BackendConfig, probe: &ProbeConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(probe.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            url: backend.function_url(&backend.list_function),
            api_key: backend.api_key.clone(),
        })
    }

    async fn fetch(&self) -> AppResult<Vec<ObjectRecord>> {
        let mut request = self.client.post(&self.url).json(&serde_json::json!({}));
        if let Some(key) = &self.api_key {
            request = request.header("apikey", key).bearer_auth(key);
        }

        let response = request.send().await?.error_for_status()?;
        let body = response.text().await?;
        let records = serde_json::from_str::<ListingBody>(&body)?.into_records();

        debug!("Listed {} objects from {}", records.len(), self.url);
        Ok(records)
    }
}

impl ObjectLister for HttpObjectLister {
    fn list_objects(&self) -> BoxFuture<'_, AppResult<Vec<ObjectRecord>>> {
        self.fetch().boxed()
    }
}

/// One line of a snapshot export
#[derive(Debug, Deserialize)]
struct SnapshotRow {
    size_bytes: u64,
    #[serde(default)]
    content_type: Option<String>,
    filename: String,
    created_at: String,
}

/// Cached snapshot file with `size_bytes,content_type,filename,created_at` columns
///
/// Lines starting with `#` are comments. `created_at` is RFC 3339.
pub struct CsvObjectLister {
    path: PathBuf,
}

impl CsvObjectLister {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record, failing on the first malformed line
    pub fn read_records(&self) -> AppResult<Vec<ObjectRecord>> {
        let file = File::open(&self.path).map_err(AppError::Io)?;
        let mut csv_reader = ReaderBuilder::new()
            .comment(Some(b'#'))
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(BufReader::new(file));

        let headers = csv_reader.headers().map_err(AppError::Csv)?.clone();
        let mut records = Vec::new();
        for result in csv_reader.records() {
            let raw = result.map_err(AppError::Csv)?;
            let line = raw.position().map(|pos| pos.line() as usize).unwrap_or(0);
            let row: SnapshotRow = raw.deserialize(Some(&headers)).map_err(AppError::Csv)?;
            records.push(row.into_record(line)?);
        }

        info!(
            "Loaded {} object records from {}",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }
}

impl SnapshotRow {
    fn into_record(self, line: usize) -> AppResult<ObjectRecord> {
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(|e| AppError::InvalidRecord {
                line,
                reason: format!("created_at '{}' is not RFC 3339: {}", self.created_at, e),
            })?;

        Ok(ObjectRecord {
            size_bytes: self.size_bytes,
            content_type: self.content_type.unwrap_or_default(),
            filename: self.filename,
            created_at,
        })
    }
}

impl ObjectLister for CsvObjectLister {
    fn list_objects(&self) -> BoxFuture<'_, AppResult<Vec<ObjectRecord>>> {
        future::ready(self.read_records()).boxed()
    }
}
