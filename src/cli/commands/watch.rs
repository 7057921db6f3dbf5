use super::analytics::AnalyticsCommand;
use crate::errors::AppResult;
use crate::reports::{OutputFormat, ReportFormatter, UsageReport};
use clap::Args;
use std::path::PathBuf;
use tracing::{info, warn};

/// Refresh usage analytics on an interval until interrupted
#[derive(Args)]
pub struct WatchCommand {
    /// Seconds between refreshes (overrides config.toml)
    #[arg(long)]
    pub interval: Option<u64>,

    /// Read object records from a CSV snapshot instead of the live listing
    #[arg(long)]
    pub snapshot_csv: Option<PathBuf>,

    /// Skip refreshes while this file exists
    #[arg(long)]
    pub pause_file: Option<PathBuf>,

    /// Output format (console, json)
    #[arg(long, default_value = "console")]
    pub format: OutputFormat,
}

impl WatchCommand {
    pub async fn run(&self) -> AppResult<()> {
        let mut config = AnalyticsCommand::config(&self.snapshot_csv, None)?;
        if let Some(interval) = self.interval {
            config.analytics.refresh_interval_seconds = interval;
        }
        let rate = config.analytics.rate_per_tib;

        let mut refresher = AnalyticsCommand::refresher(&config)?;
        if let Some(pause_file) = self.pause_file.clone() {
            refresher = refresher.with_should_run(move || !pause_file.exists());
        }

        info!(
            "Watching storage usage every {}s (Ctrl-C to stop)",
            refresher.interval().as_secs()
        );

        let mut snapshots = refresher.subscribe();
        refresher.start();

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupted, stopping");
                    break;
                }
                changed = snapshots.changed() => {
                    if changed.is_err() {
                        warn!("Analytics refresher went away");
                        break;
                    }
                    let latest = snapshots.borrow_and_update().clone();
                    if let Some(snapshot) = latest {
                        let report = UsageReport::from_snapshot(&snapshot, rate);
                        print!("{}", ReportFormatter::format_usage(&report, &self.format)?);
                    }
                }
            }
        }

        refresher.stop();
        Ok(())
    }
}
