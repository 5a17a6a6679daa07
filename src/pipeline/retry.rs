//! Bounded retry with linear backoff.
//!
//! Wraps any fetch-or-parse operation. Attempts run strictly one after
//! another; the pause before attempt `n + 1` is `min(base * n, max)`.
//! When the last attempt fails, its error is returned as-is so callers can
//! still tell a timeout from an HTTP status from a parse failure.

use std::future::Future;
use std::time::Duration;

use crate::error::Result;
use crate::models::RetryConfig;

/// Retry policy configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl RetryPolicy {
    /// `max_attempts` is clamped to at least one attempt.
    pub fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay: max_delay.max(base_delay),
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            config.max_attempts,
            Duration::from_millis(config.base_delay_ms),
            Duration::from_millis(config.max_delay_ms),
        )
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Pause after the given failed attempt (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(attempt)
            .min(self.max_delay)
    }

    /// Run `operation` until it succeeds, fails with a non-retryable error,
    /// or runs out of attempts.
    pub async fn run<T, F, Fut>(&self, label: &str, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;
        loop {
            match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        log::info!("{}: succeeded on attempt {}", label, attempt);
                    }
                    return Ok(value);
                }
                Err(error) if !error.is_retryable() => return Err(error),
                Err(error) if attempt >= self.max_attempts => {
                    log::warn!(
                        "{}: attempt {}/{} failed, giving up: {}",
                        label,
                        attempt,
                        self.max_attempts,
                        error
                    );
                    return Err(error);
                }
                Err(error) => {
                    let delay = self.delay_after(attempt);
                    log::warn!(
                        "{}: attempt {}/{} failed, retrying in {:?}: {}",
                        label,
                        attempt,
                        self.max_attempts,
                        delay,
                        error
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}
