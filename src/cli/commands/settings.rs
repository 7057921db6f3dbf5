use crate::config::AppConfig;
use crate::errors::AppResult;
use crate::probe::RetryPolicy;
use crate::reports::{OutputFormat, ReportFormatter};
use crate::store::{open_config_store, SettingsService};
use crate::types::StorageSettings;
use clap::{Args, Subcommand};
use std::path::PathBuf;
use tracing::info;

/// Show or update the persisted storage settings
#[derive(Args)]
pub struct SettingsCommand {
    /// Settings database path (overrides config.toml)
    #[arg(long, global = true)]
    pub settings_path: Option<PathBuf>,

    #[command(subcommand)]
    pub action: SettingsAction,
}

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print the saved settings
    Show {
        /// Output format (console, json)
        #[arg(long, default_value = "console")]
        format: OutputFormat,
    },
    /// Validate and save settings, retrying on a stale schema cache
    Set(SetArgs),
}

#[derive(Args)]
pub struct SetArgs {
    #[arg(long)]
    pub bucket: Option<String>,

    #[arg(long)]
    pub region: Option<String>,

    /// Explicit storage host, e.g. s3.eu-central-2.wasabisys.com
    #[arg(long)]
    pub endpoint_host: Option<String>,

    #[arg(long)]
    pub public_base_url: Option<String>,

    #[arg(long)]
    pub max_upload_mb: Option<u32>,
}

impl SetArgs {
    /// Overlay the given fields on the current record
    fn apply(&self, mut settings: StorageSettings) -> StorageSettings {
        if let Some(bucket) = &self.bucket {
            settings.bucket_name = bucket.clone();
        }
        if let Some(region) = &self.region {
            settings.region = region.clone();
        }
        if let Some(host) = &self.endpoint_host {
            settings.endpoint_host = Some(host.clone());
        }
        if let Some(url) = &self.public_base_url {
            settings.public_base_url = Some(url.clone());
        }
        if let Some(limit) = self.max_upload_mb {
            settings.max_upload_mb = limit;
        }
        settings
    }
}

impl SettingsCommand {
    pub async fn run(&self) -> AppResult<()> {
        let mut config = AppConfig::load()?;
        if let Some(path) = &self.settings_path {
            config.database.settings_path = path.clone();
        }

        let store = open_config_store(&config)?;
        let service = SettingsService::new(store, RetryPolicy::from_config(&config.retry));

        match &self.action {
            SettingsAction::Show { format } => {
                let settings = service.load().await?;
                print!("{}", ReportFormatter::format_settings(settings.as_ref(), format)?);
            }
            SettingsAction::Set(args) => {
                let current = service.load().await?.unwrap_or_else(|| {
                    StorageSettings::new(&config.storage.bucket_name, &config.storage.region)
                });
                let saved = service.save(args.apply(current)).await?;
                info!("Settings saved at {:?}", saved.updated_at);
                print!(
                    "{}",
                    ReportFormatter::format_settings(Some(&saved), &OutputFormat::Console)?
                );
            }
        }
        Ok(())
    }
}
