//! Monthly storage cost projection

use crate::config::AnalyticsConfig;

/// 2^40 bytes
pub const BYTES_PER_TIB: f64 = 1_099_511_627_776.0;

/// Published flat rate per TiB per month
pub const DEFAULT_RATE_PER_TIB: f64 = 6.99;

/// Converts a byte total into a projected monthly cost at a per-TiB rate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostEstimator {
    rate_per_tib: f64,
}

impl CostEstimator {
    pub fn new(rate_per_tib: f64) -> Self {
        Self { rate_per_tib }
    }

    pub fn from_config(config: &AnalyticsConfig) -> Self {
        Self::new(config.rate_per_tib)
    }

    pub fn rate_per_tib(&self) -> f64 {
        self.rate_per_tib
    }

    /// Unrounded cost; rounding happens at display time only
    pub fn estimate(&self, total_bytes: u64) -> f64 {
        (total_bytes as f64 / BYTES_PER_TIB) * self.rate_per_tib
    }
}

impl Default for CostEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_RATE_PER_TIB)
    }
}
