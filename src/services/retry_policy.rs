use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::domain::errors::LlmError;
use crate::domain::models::RetryConfig;

/// Bounded retry with exponential backoff for LLM calls.
///
/// Only transient errors ([`LlmError::is_transient`]) are retried. The delay
/// before retry `n` (0-indexed) is `initial_delay_ms * backoff_factor^n`,
/// capped at `max_delay_ms`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    initial_delay_ms: u64,
    backoff_factor: u32,
    max_delay_ms: u64,
}

impl RetryPolicy {
    pub const fn new(
        max_retries: u32,
        initial_delay_ms: u64,
        backoff_factor: u32,
        max_delay_ms: u64,
    ) -> Self {
        Self {
            max_retries,
            initial_delay_ms,
            backoff_factor,
            max_delay_ms,
        }
    }

    /// Retries after the initial attempt.
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Delay before retry number `attempt` (0-indexed):
    /// `initial_delay_ms * backoff_factor^attempt`, capped at `max_delay_ms`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let delay_ms = self
            .initial_delay_ms
            .saturating_mul(u64::from(self.backoff_factor).saturating_pow(attempt))
            .min(self.max_delay_ms);

        Duration::from_millis(delay_ms)
    }

    /// Run `operation` until it succeeds, fails permanently, or the retry
    /// budget is spent. The last error is returned unchanged.
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T, LlmError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, LlmError>>,
    {
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(result) => {
                    if attempt > 0 {
                        debug!(retries = attempt, "LLM call succeeded after retries");
                    }
                    return Ok(result);
                }
                Err(err) if err.is_transient() && attempt < self.max_retries => {
                    let delay = self.delay_for(attempt);
                    warn!(
                        attempt = attempt + 1,
                        max_retries = self.max_retries,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "LLM call failed, retrying"
                    );

                    sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    if err.is_transient() {
                        warn!(attempts = attempt + 1, error = %err, "LLM call failed after all retries");
                    } else {
                        debug!(error = %err, "permanent LLM error, not retrying");
                    }
                    return Err(err);
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self::new(
            config.max_retries,
            config.initial_delay_ms,
            config.backoff_factor,
            config.max_delay_ms,
        )
    }
}
