//! Common Test Utilities
//!
//! Scripted probe clients, in-memory stores and record builders shared by the
//! unit and integration suites.

#![allow(dead_code)]

pub mod fakes;

use std::sync::Arc;
use std::time::Duration;
use storage_health::config::AppConfig;
use storage_health::health::ProbeOrchestrator;
use storage_health::probe::{ProbeClient, ProbeTargets};

/// Probe timeout used by orchestrators built in tests
pub const TEST_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Targets built from default configuration
pub fn default_targets() -> ProbeTargets {
    let config = AppConfig::get_defaults().expect("default config");
    ProbeTargets::resolve(&config, None)
}

/// Orchestrator over the given client with default targets
pub fn orchestrator_with(client: Arc<dyn ProbeClient>) -> ProbeOrchestrator {
    ProbeOrchestrator::new(client, default_targets(), TEST_PROBE_TIMEOUT)
}
