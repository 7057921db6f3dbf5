use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use tracing::warn;

/// Application configuration loaded from config.toml or environment variables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub backend: BackendConfig,
    pub probe: ProbeConfig,
    pub retry: RetryConfig,
    pub analytics: AnalyticsConfig,
    pub database: DatabaseConfig,
}

/// Object-storage endpoint used by the reachability probe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub scheme: String,
    pub bucket_name: String,
    pub region: String,
    /// Host pattern; `{region}` is substituted with the configured region
    pub endpoint_template: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            scheme: "https".to_string(),
            bucket_name: "media-uploads".to_string(),
            region: "us-east-1".to_string(),
            endpoint_template: "s3.{region}.wasabisys.com".to_string(),
        }
    }
}

/// Backend function host used by the health, upload and smoke-test probes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub health_function: String,
    pub upload_function: String,
    pub list_function: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:54321".to_string(),
            api_key: None,
            health_function: "wasabi-connection-test".to_string(),
            upload_function: "wasabi-upload".to_string(),
            list_function: "wasabi-list".to_string(),
        }
    }
}

impl BackendConfig {
    /// Full URL of a backend function by slug
    pub fn function_url(&self, slug: &str) -> String {
        format!(
            "{}/functions/v1/{}",
            self.base_url.trim_end_matches('/'),
            slug
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    pub timeout_seconds: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self { timeout_seconds: 10 }
    }
}

/// Schema-cache retry tuning for the settings write path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_retries: usize,
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            delay_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    pub refresh_interval_seconds: u64,
    /// Monthly storage price per tebibyte
    pub rate_per_tib: f64,
    /// Cached object snapshot used instead of the live listing when set
    pub snapshot_csv: Option<PathBuf>,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            refresh_interval_seconds: 30,
            rate_per_tib: 6.99,
            snapshot_csv: None,
        }
    }
}

/// Where storage settings are persisted
///
/// A configured `rest_url` selects the REST data API; otherwise the local
/// SQLite file at `settings_path` is used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub settings_path: PathBuf,
    pub rest_url: Option<String>,
    pub settings_table: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            settings_path: PathBuf::from("./storage_settings.db"),
            rest_url: None,
            settings_table: "storage_settings".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from config.toml file and environment variables
    /// Environment variables take precedence over file configuration
    pub fn load() -> Result<Self, ConfigError> {
        let storage = StorageConfig::default();
        let backend = BackendConfig::default();
        let probe = ProbeConfig::default();
        let retry = RetryConfig::default();
        let analytics = AnalyticsConfig::default();
        let database = DatabaseConfig::default();

        let config = Config::builder()
            .set_default("storage.scheme", storage.scheme)?
            .set_default("storage.bucket_name", storage.bucket_name)?
            .set_default("storage.region", storage.region)?
            .set_default("storage.endpoint_template", storage.endpoint_template)?
            .set_default("backend.base_url", backend.base_url)?
            .set_default("backend.health_function", backend.health_function)?
            .set_default("backend.upload_function", backend.upload_function)?
            .set_default("backend.list_function", backend.list_function)?
            .set_default("probe.timeout_seconds", probe.timeout_seconds)?
            .set_default("retry.max_retries", retry.max_retries as i64)?
            .set_default("retry.delay_ms", retry.delay_ms)?
            .set_default(
                "analytics.refresh_interval_seconds",
                analytics.refresh_interval_seconds,
            )?
            .set_default("analytics.rate_per_tib", analytics.rate_per_tib)?
            .set_default(
                "database.settings_path",
                database.settings_path.to_string_lossy().to_string(),
            )?
            .set_default("database.settings_table", database.settings_table)?
            // Load from config.toml if it exists
            .add_source(File::with_name("config").required(false))
            // STORAGE_HEALTH_BACKEND__BASE_URL style overrides
            .add_source(
                config::Environment::with_prefix("STORAGE_HEALTH")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let mut app_config: AppConfig = config.try_deserialize()?;

        // Conventional names used by the dashboard deployment
        if let Ok(key) = env::var("BACKEND_API_KEY") {
            app_config.backend.api_key = Some(key);
        }

        if let Ok(path) = env::var("STORAGE_SNAPSHOT_CSV") {
            app_config.analytics.snapshot_csv = Some(PathBuf::from(path));
        }

        if app_config.probe.timeout_seconds == 0 {
            return Err(ConfigError::Message(
                "probe.timeout_seconds must be greater than zero; probes may not wait indefinitely"
                    .to_string(),
            ));
        }

        Ok(app_config)
    }

    /// Loaded configuration, or the built-in defaults when loading fails
    ///
    /// For fixtures and examples only; commands use [`AppConfig::load`] so a
    /// bad value is reported instead of silently replaced.
    pub fn get_defaults() -> Result<Self, ConfigError> {
        match Self::load() {
            Ok(config) => Ok(config),
            Err(e) => {
                warn!("Falling back to built-in configuration defaults: {}", e);
                Ok(Self::builtin())
            }
        }
    }

    fn builtin() -> Self {
        Self {
            storage: StorageConfig::default(),
            backend: BackendConfig::default(),
            probe: ProbeConfig::default(),
            retry: RetryConfig::default(),
            analytics: AnalyticsConfig::default(),
            database: DatabaseConfig::default(),
        }
    }
}
