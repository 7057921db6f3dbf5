//! SQLite-backed settings store

use super::ConfigStore;
use crate::errors::{AppResult, StoreError, StoreResult};
use crate::types::StorageSettings;
use chrono::{DateTime, Utc};
use futures::future::{self, BoxFuture};
use futures::FutureExt;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

/// Single-row settings table; `id` is pinned to 1
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS storage_settings (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    provider TEXT NOT NULL,
    bucket_name TEXT NOT NULL,
    region TEXT NOT NULL,
    endpoint_host TEXT,
    public_base_url TEXT,
    max_upload_mb INTEGER NOT NULL,
    updated_at TEXT
);";

pub struct SqliteConfigStore {
    connection: Mutex<Connection>,
}

impl SqliteConfigStore {
    /// Open (or create) the settings database at `path`
    pub fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let connection = Connection::open(path.as_ref())?;
        connection.execute_batch(SCHEMA)?;
        info!(
            "Settings database connection established: {}",
            path.as_ref().display()
        );
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    pub fn in_memory() -> AppResult<Self> {
        let connection = Connection::open_in_memory()?;
        connection.execute_batch(SCHEMA)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn with_connection<T>(
        &self,
        f: impl FnOnce(&Connection) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let connection = self.connection.lock().map_err(|_| {
            StoreError::ConnectionFailed("settings connection poisoned".to_string())
        })?;
        f(&connection)
    }

    fn read(&self) -> StoreResult<StorageSettings> {
        self.with_connection(|conn| {
            let row = conn
                .query_row(
                    "SELECT provider, bucket_name, region, endpoint_host, public_base_url,
                            max_upload_mb, updated_at
                     FROM storage_settings WHERE id = 1",
                    [],
                    row_to_settings,
                )
                .optional()?;

            match row {
                Some(settings) => settings,
                None => Err(StoreError::NotFound),
            }
        })
    }

    fn write(&self, settings: &StorageSettings) -> StoreResult<()> {
        self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO storage_settings
                    (id, provider, bucket_name, region, endpoint_host, public_base_url,
                     max_upload_mb, updated_at)
                 VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(id) DO UPDATE SET
                    provider = excluded.provider,
                    bucket_name = excluded.bucket_name,
                    region = excluded.region,
                    endpoint_host = excluded.endpoint_host,
                    public_base_url = excluded.public_base_url,
                    max_upload_mb = excluded.max_upload_mb,
                    updated_at = excluded.updated_at",
                params![
                    settings.provider,
                    settings.bucket_name,
                    settings.region,
                    settings.endpoint_host,
                    settings.public_base_url,
                    settings.max_upload_mb,
                    settings.updated_at.map(|ts| ts.to_rfc3339()),
                ],
            )?;
            debug!("Saved settings for bucket {}", settings.bucket_name);
            Ok(())
        })
    }
}

/// Outer result is the SQLite read, inner result the timestamp parse
fn row_to_settings(row: &Row<'_>) -> rusqlite::Result<StoreResult<StorageSettings>> {
    let updated_at: Option<String> = row.get(6)?;
    let updated_at = match updated_at.map(|raw| parse_timestamp(&raw)).transpose() {
        Ok(ts) => ts,
        Err(e) => return Ok(Err(e)),
    };

    Ok(Ok(StorageSettings {
        provider: row.get(0)?,
        bucket_name: row.get(1)?,
        region: row.get(2)?,
        endpoint_host: row.get(3)?,
        public_base_url: row.get(4)?,
        max_upload_mb: row.get(5)?,
        updated_at,
    }))
}

fn parse_timestamp(raw: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| StoreError::CallFailed {
            operation: "read settings".to_string(),
            message: format!("bad updated_at '{}': {}", raw, e),
        })
}

impl ConfigStore for SqliteConfigStore {
    fn get(&self) -> BoxFuture<'_, StoreResult<StorageSettings>> {
        future::ready(self.read()).boxed()
    }

    fn set<'a>(&'a self, settings: &'a StorageSettings) -> BoxFuture<'a, StoreResult<()>> {
        future::ready(self.write(settings)).boxed()
    }
}
