//! Subcommand implementations and the wiring they share

pub mod analytics;
pub mod health;
pub mod settings;
pub mod smoke;
pub mod watch;

use crate::config::AppConfig;
use crate::errors::AppResult;
use crate::health::{LogLevel, ProbeOrchestrator};
use crate::probe::{HttpProbeClient, ProbeTargets, RetryPolicy};
use crate::reports::OutputFormat;
use crate::store::{open_config_store, SettingsService};
use crate::types::StorageSettings;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Overrides shared by the probe commands
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ProbeArgs {
    /// Backend base URL (overrides config.toml and env vars)
    #[arg(long)]
    pub backend_url: Option<String>,

    /// Bucket to probe, instead of the saved settings
    #[arg(long)]
    pub bucket: Option<String>,

    /// Storage region, instead of the saved settings
    #[arg(long)]
    pub region: Option<String>,

    /// Per-probe timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Settings database path (overrides config.toml)
    #[arg(long)]
    pub settings_path: Option<PathBuf>,
}

impl ProbeArgs {
    /// Load configuration and apply command-line overrides
    pub fn config(&self) -> AppResult<AppConfig> {
        let mut config = AppConfig::load()?;
        if let Some(url) = &self.backend_url {
            config.backend.base_url = url.clone();
        }
        if let Some(timeout) = self.timeout.filter(|t| *t > 0) {
            config.probe.timeout_seconds = timeout;
        }
        if let Some(path) = &self.settings_path {
            config.database.settings_path = path.clone();
        }
        Ok(config)
    }

    /// Saved settings with any `--bucket`/`--region` override applied
    async fn effective_settings(&self, config: &AppConfig) -> Option<StorageSettings> {
        let mut settings = load_saved_settings(config).await;

        if self.bucket.is_some() || self.region.is_some() {
            let mut merged = settings.take().unwrap_or_else(|| {
                StorageSettings::new(&config.storage.bucket_name, &config.storage.region)
            });
            if let Some(bucket) = &self.bucket {
                merged.bucket_name = bucket.clone();
            }
            if let Some(region) = &self.region {
                merged.region = region.clone();
                // An explicit region invalidates a saved host for another region
                merged.endpoint_host = None;
            }
            settings = Some(merged);
        }

        settings
    }

    pub async fn orchestrator(&self) -> AppResult<ProbeOrchestrator> {
        let config = self.config()?;
        let settings = self.effective_settings(&config).await;
        let client = HttpProbeClient::new(&config.probe, &config.backend)?;
        let targets = ProbeTargets::resolve(&config, settings.as_ref());
        info!("Probing storage at {}", targets.storage_url);

        Ok(ProbeOrchestrator::new(
            Arc::new(client),
            targets,
            Duration::from_secs(config.probe.timeout_seconds),
        ))
    }
}

/// Saved settings if the store has any; store failures degrade to configuration
pub async fn load_saved_settings(config: &AppConfig) -> Option<StorageSettings> {
    let store = match open_config_store(config) {
        Ok(store) => store,
        Err(e) => {
            warn!("Settings store unavailable, using configured bucket: {}", e);
            return None;
        }
    };

    let service = SettingsService::new(store, RetryPolicy::from_config(&config.retry));
    match service.load().await {
        Ok(settings) => settings,
        Err(e) => {
            warn!("Could not read saved settings, using configured bucket: {}", e);
            None
        }
    }
}

/// Print orchestration log lines to stderr as they are emitted
///
/// Console mode only, so JSON on stdout stays clean. The follower ends once
/// the orchestrator is dropped.
pub fn follow_log(
    orchestrator: &ProbeOrchestrator,
    format: OutputFormat,
) -> Option<JoinHandle<()>> {
    if format != OutputFormat::Console {
        return None;
    }

    let mut events = orchestrator.subscribe();
    Some(tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(entry) => {
                    if entry.level != LogLevel::Info {
                        eprintln!("{}", entry.line());
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Log follower skipped {} lines", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    }))
}
