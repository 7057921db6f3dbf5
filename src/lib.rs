//! Object-storage connectivity health checks and storage-usage analytics
//!

pub mod analysis;
pub mod cli;
pub mod config;
pub mod errors;
pub mod health;
pub mod probe;
pub mod reports;
pub mod store;
pub mod types;
pub mod utils;
