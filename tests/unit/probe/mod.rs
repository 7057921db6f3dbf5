//! Probe layer unit tests

pub mod targets;
