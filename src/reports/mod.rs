//! Report formatting and output generation
//!
//! Provides formatting for probe runs, usage analytics and settings via the
//! [`ReportFormatter`] facade. Supports Console and JSON output formats.

pub mod health;
pub mod settings;
pub mod usage;
pub mod utils;

pub use usage::{CategoryUsage, UsageReport};

use crate::errors::AppResult;
use crate::health::{SmokeTestReport, TopologyReport};
use crate::types::StorageSettings;
use std::str::FromStr;

/// Output format options for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Console,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "console" => Ok(OutputFormat::Console),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{}'", other)),
        }
    }
}

/// Facade for all report formatting operations
pub struct ReportFormatter;

impl ReportFormatter {
    pub fn format_topology(r: &TopologyReport, f: &OutputFormat) -> AppResult<String> {
        health::format_topology_report(r, f)
    }
    pub fn format_smoke_tests(r: &SmokeTestReport, f: &OutputFormat) -> AppResult<String> {
        health::format_smoke_report(r, f)
    }
    pub fn format_usage(r: &UsageReport, f: &OutputFormat) -> AppResult<String> {
        usage::format_usage_report(r, f)
    }
    pub fn format_settings(s: Option<&StorageSettings>, f: &OutputFormat) -> AppResult<String> {
        settings::format_settings(s, f)
    }
}
