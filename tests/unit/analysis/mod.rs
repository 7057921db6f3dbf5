//! Analytics unit tests

pub mod classifier;
pub mod refresher;
