//! Storage usage analytics
//!
//! - **Classifier** - content type and filename to usage [`crate::types::Category`]
//! - **Aggregator** - category partition, trailing-week histogram and cost
//! - **Cost** - per-TiB monthly projection
//! - **Refresh** - background refresh task with an activity predicate

pub mod aggregator;
pub mod classifier;
pub mod cost;
pub mod refresh;

pub use aggregator::AnalyticsAggregator;
pub use classifier::CategoryClassifier;
pub use cost::{CostEstimator, BYTES_PER_TIB, DEFAULT_RATE_PER_TIB};
pub use refresh::{AnalyticsRefresher, RefreshOutcome, ShouldRun};
