//! Topology and smoke-test report formatters

use super::utils::export_json;
use super::OutputFormat;
use crate::errors::AppResult;
use crate::health::{SmokeTestReport, TopologyReport};
use crate::types::{Edge, EdgeHealth};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n";

/// Format a topology run: per-edge status, overall status and the run log
pub fn format_topology_report(
    report: &TopologyReport,
    format: &OutputFormat,
) -> AppResult<String> {
    match format {
        OutputFormat::Json => export_json(report),
        OutputFormat::Console => {
            let mut output = String::new();
            output.push_str("\n🔌 CONNECTION TOPOLOGY\n");
            output.push_str(RULE);

            for edge in Edge::ALL {
                let health = report.edges.get(&edge).copied().unwrap_or(EdgeHealth::Warn);
                output.push_str(&format!("{:<18} {}\n", edge.display_name(), health));
            }
            output.push_str(&format!("{:<18} {}\n\n", "overall", report.overall));

            output.push_str("Probes:\n");
            for outcome in &report.outcomes {
                output.push_str(&format!(
                    "  {:<22} HTTP {:<4} {:>6}ms  {}\n",
                    outcome.name,
                    outcome.status_label(),
                    outcome.latency_ms,
                    outcome.error_kind.display_name()
                ));
            }

            output.push_str("\nLog:\n");
            for line in &report.log {
                output.push_str(&format!("  {}\n", line));
            }

            let elapsed = report.finished_at - report.started_at;
            output.push_str(&format!(
                "\nCompleted in {}ms\n",
                elapsed.num_milliseconds()
            ));
            Ok(output)
        }
    }
}

/// Format a smoke-test run in catalog order
pub fn format_smoke_report(
    report: &SmokeTestReport,
    format: &OutputFormat,
) -> AppResult<String> {
    match format {
        OutputFormat::Json => export_json(report),
        OutputFormat::Console => {
            let mut output = String::new();
            output.push_str("\n🧪 FUNCTION SMOKE TESTS\n");
            output.push_str(RULE);

            for (result, outcome) in report.results.iter().zip(&report.outcomes) {
                output.push_str(&format!(
                    "{:<6} {:<22} HTTP {:<4} {:>6}ms  {}\n",
                    result.status.tag(),
                    result.name,
                    outcome.status_label(),
                    outcome.latency_ms,
                    outcome.detail
                ));
            }

            output.push_str(&format!(
                "\n{} functions, worst status {}\n",
                report.results.len(),
                report.worst()
            ));
            Ok(output)
        }
    }
}
