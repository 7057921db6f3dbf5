//! Integration Tests Module
//!
//! End-to-end scenarios across the probe, health, store and analytics layers.

pub mod topology_scenarios;
