use super::{follow_log, ProbeArgs};
use crate::errors::{AppError, AppResult};
use crate::reports::{OutputFormat, ReportFormatter};
use crate::types::EdgeHealth;
use clap::Args;
use tracing::info;

/// Run the three-edge topology check
#[derive(Args)]
pub struct HealthCommand {
    #[command(flatten)]
    pub probe: ProbeArgs,

    /// Output format (console, json)
    #[arg(long, default_value = "console")]
    pub format: OutputFormat,

    /// Exit with an error unless every edge is OK
    #[arg(long)]
    pub strict: bool,
}

impl HealthCommand {
    pub async fn run(&self) -> AppResult<()> {
        info!("=== Storage Topology Check ===");

        let orchestrator = self.probe.orchestrator().await?;
        let follower = follow_log(&orchestrator, self.format);

        let report = orchestrator.run_topology_check().await?;
        drop(orchestrator);
        if let Some(follower) = follower {
            let _ = follower.await;
        }

        print!("{}", ReportFormatter::format_topology(&report, &self.format)?);

        if self.strict && report.overall != EdgeHealth::Ok {
            return Err(AppError::InvalidData(format!(
                "topology check finished with overall status {}",
                report.overall
            )));
        }
        Ok(())
    }
}
