//! Retry and timeout utilities
//!
//! Two helpers live here:
//! - [`execute_with_timeout`] bounds any probe future so no probe waits indefinitely
//! - [`RetryPolicy`] re-issues a settings write that hit a stale schema cache
//!
//! The retry policy only reacts to [`crate::errors::StoreError::SchemaCacheTransient`]
//! and is never wrapped around a health probe: a health probe reports the
//! current state, transient failures included.

use crate::config::RetryConfig;
use crate::errors::StoreResult;
use std::future::Future;
use std::time::Duration;
use tokio::time::error::Elapsed;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, warn};

/// Run a future with an upper bound on its duration
///
/// # Returns
/// `Result<T, Elapsed>`: `Err` when the bound elapsed before the future finished
///
/// # Example
/// ```
/// use std::time::Duration;
/// use storage_health::probe::execute_with_timeout;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let result = execute_with_timeout(Duration::from_secs(1), async { 42 }).await;
/// assert_eq!(result.unwrap(), 42);
/// # }
/// ```
pub async fn execute_with_timeout<T, F>(limit: Duration, operation: F) -> Result<T, Elapsed>
where
    F: Future<Output = T>,
{
    timeout(limit, operation).await
}

/// Fixed-delay retry for the schema-cache-transient error class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: usize,
    delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

impl RetryPolicy {
    pub fn new(max_retries: usize, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(config.max_retries, Duration::from_millis(config.delay_ms))
    }

    /// Total attempts including the first one
    pub fn max_attempts(&self) -> usize {
        self.max_retries + 1
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `op`, re-issuing it after `delay` while it fails with a schema-cache transient
    ///
    /// Success or any other error returns immediately. Once the retries are
    /// exhausted the last transient error is returned.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut op: F) -> StoreResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = StoreResult<T>>,
    {
        let mut attempts = 0;

        loop {
            attempts += 1;

            match op().await {
                Ok(value) => {
                    if attempts > 1 {
                        debug!("{} succeeded after {} attempts", operation, attempts);
                    }
                    return Ok(value);
                }
                Err(e) if e.is_schema_cache_transient() && attempts <= self.max_retries => {
                    warn!(
                        "{} attempt {} hit a stale schema cache, retrying in {:?}: {}",
                        operation, attempts, self.delay, e
                    );
                    sleep(self.delay).await;
                }
                Err(e) => {
                    if e.is_schema_cache_transient() {
                        error!(
                            "{} still failing after {} attempts: {}",
                            operation, attempts, e
                        );
                    }
                    return Err(e);
                }
            }
        }
    }
}
