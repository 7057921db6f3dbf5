//! Health orchestration unit tests

pub mod aggregator;
