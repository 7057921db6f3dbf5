use super::{follow_log, ProbeArgs};
use crate::errors::{AppError, AppResult};
use crate::probe::default_function_catalog;
use crate::reports::{OutputFormat, ReportFormatter};
use clap::Args;
use tracing::info;

/// Invoke each backend function once with a minimal payload
#[derive(Args)]
pub struct SmokeCommand {
    #[command(flatten)]
    pub probe: ProbeArgs,

    /// Only run the named functions (repeatable)
    #[arg(long = "function")]
    pub functions: Vec<String>,

    /// Run the topology check first so lookups use a freshly uploaded key
    #[arg(long)]
    pub with_upload: bool,

    /// Output format (console, json)
    #[arg(long, default_value = "console")]
    pub format: OutputFormat,
}

impl SmokeCommand {
    pub async fn run(&self) -> AppResult<()> {
        info!("=== Backend Function Smoke Tests ===");

        let catalog: Vec<_> = default_function_catalog()
            .into_iter()
            .filter(|f| self.functions.is_empty() || self.functions.contains(&f.name))
            .collect();
        if catalog.is_empty() {
            return Err(AppError::Config(format!(
                "no catalog function matches {:?}",
                self.functions
            )));
        }

        let orchestrator = self.probe.orchestrator().await?;

        if self.with_upload {
            let topology = orchestrator.run_topology_check().await?;
            info!(
                "Topology check before smoke tests: overall {}, key {:?}",
                topology.overall,
                orchestrator.last_object_key()
            );
        }

        let follower = follow_log(&orchestrator, self.format);
        let report = orchestrator.run_function_smoke_tests(&catalog).await?;
        drop(orchestrator);
        if let Some(follower) = follower {
            let _ = follower.await;
        }

        print!("{}", ReportFormatter::format_smoke_tests(&report, &self.format)?);
        Ok(())
    }
}
