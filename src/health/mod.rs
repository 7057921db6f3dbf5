//! Topology health module
//!
//! - **Aggregator** - Per-edge health state and worst-of overall status
//! - **Orchestrator** - Sequential probe runs with a single-flight busy flag
//! - **Events** - Log entries broadcast while a run progresses
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use storage_health::config::AppConfig;
//! use storage_health::health::ProbeOrchestrator;
//! use storage_health::probe::{HttpProbeClient, ProbeTargets};
//!
//! # async fn example() -> storage_health::errors::AppResult<()> {
//! let config = AppConfig::load()?;
//! let client = HttpProbeClient::new(&config.probe, &config.backend)?;
//! let orchestrator = ProbeOrchestrator::new(
//!     Arc::new(client),
//!     ProbeTargets::resolve(&config, None),
//!     Duration::from_secs(config.probe.timeout_seconds),
//! );
//!
//! let report = orchestrator.run_topology_check().await?;
//! println!("overall: {}", report.overall);
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
pub mod events;
pub mod orchestrator;

pub use aggregator::EdgeStatusAggregator;
pub use events::{LogEntry, LogLevel};
pub use orchestrator::{
    interpret_backend_health, interpret_upload, BackendHealthReading, FunctionStatus,
    ProbeOrchestrator, SmokeTestReport, TopologyReport, UploadReading,
};
