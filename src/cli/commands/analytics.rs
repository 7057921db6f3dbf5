use crate::analysis::{AnalyticsAggregator, AnalyticsRefresher, CostEstimator, RefreshOutcome};
use crate::config::AppConfig;
use crate::errors::{AppError, AppResult};
use crate::reports::{OutputFormat, ReportFormatter, UsageReport};
use crate::store::open_object_lister;
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Aggregate storage usage once and print the report
#[derive(Args)]
pub struct AnalyticsCommand {
    /// Read object records from a CSV snapshot instead of the live listing
    #[arg(long)]
    pub snapshot_csv: Option<PathBuf>,

    /// Price per TiB per month (overrides config.toml)
    #[arg(long)]
    pub rate: Option<f64>,

    /// Output format (console, json)
    #[arg(long, default_value = "console")]
    pub format: OutputFormat,
}

impl AnalyticsCommand {
    /// Configuration with command-line overrides applied
    pub fn config(
        snapshot_csv: &Option<PathBuf>,
        rate: Option<f64>,
    ) -> AppResult<AppConfig> {
        let mut config = AppConfig::load()?;
        if let Some(path) = snapshot_csv {
            config.analytics.snapshot_csv = Some(path.clone());
        }
        if let Some(rate) = rate {
            if !rate.is_finite() || rate < 0.0 {
                return Err(AppError::Config(format!("invalid rate {}", rate)));
            }
            config.analytics.rate_per_tib = rate;
        }
        Ok(config)
    }

    pub fn refresher(config: &AppConfig) -> AppResult<AnalyticsRefresher> {
        let lister = open_object_lister(config)?;
        let aggregator = AnalyticsAggregator::new(CostEstimator::from_config(&config.analytics));
        Ok(AnalyticsRefresher::new(
            lister,
            aggregator,
            Duration::from_secs(config.analytics.refresh_interval_seconds),
        ))
    }

    pub async fn run(&self) -> AppResult<()> {
        info!("=== Storage Usage Analytics ===");

        let config = Self::config(&self.snapshot_csv, self.rate)?;
        let refresher = Self::refresher(&config)?;

        let snapshot = match refresher.refresh_now().await? {
            RefreshOutcome::Refreshed(snapshot) => snapshot,
            other => {
                return Err(AppError::InvalidData(format!(
                    "analytics refresh did not complete: {:?}",
                    other
                )))
            }
        };

        let report = UsageReport::from_snapshot(&snapshot, config.analytics.rate_per_tib);
        print!("{}", ReportFormatter::format_usage(&report, &self.format)?);
        Ok(())
    }
}
