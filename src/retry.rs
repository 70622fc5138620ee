//! Retry logic with exponential backoff
//!
//! Provider clients retry the way the vendor SDKs do: a bounded number of
//! extra attempts (`max_retries`), exponential backoff with jitter, and the
//! `Retry-After` hint honoured for rate limits. Connection failures, timeouts,
//! 408, 409, 429 and 5xx responses are retried; everything else surfaces
//! immediately.
//!
//! The executor holds no mutable state, so a single handler can serve any
//! number of concurrent calls.

use crate::error::{LlmError, LlmResult};
use crate::logging::{log_debug, log_error};

use std::time::{Duration, Instant};
use tokio::time::sleep;

/// Retry policy configuration for provider requests
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first one
    pub max_attempts: u32,
    /// Initial delay before first retry
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
    /// Maximum total operation time
    pub total_timeout: Duration,
    /// Request timeout for individual attempts
    pub request_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_max_retries(crate::config::DEFAULT_MAX_RETRIES)
    }
}

impl RetryPolicy {
    /// Policy equivalent to an SDK client built with `max_retries`.
    pub fn from_max_retries(max_retries: u32) -> Self {
        Self {
            max_attempts: max_retries.saturating_add(1),
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
            backoff_multiplier: 2.0,
            total_timeout: Duration::from_secs(1800),
            request_timeout: Duration::from_secs(600),
        }
    }
}

/// Retry executor that handles exponential backoff
#[derive(Debug, Clone)]
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl Default for RetryExecutor {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}

impl RetryExecutor {
    /// Create a new retry executor with the given policy
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Execute a request with retry logic
    pub async fn execute<F, Fut, T>(&self, operation: F) -> LlmResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = LlmResult<T>>,
    {
        let start_time = Instant::now();
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            log_debug!(
                attempt = attempt,
                max_attempts = max_attempts,
                "Executing request with retry logic"
            );

            let error = match tokio::time::timeout(self.policy.request_timeout, operation()).await
            {
                Ok(Ok(response)) => {
                    log_debug!(
                        attempt = attempt,
                        duration_ms = start_time.elapsed().as_millis(),
                        "Request succeeded"
                    );
                    return Ok(response);
                }
                Ok(Err(error)) => error,
                Err(_elapsed) => LlmError::timeout_after(self.policy.request_timeout),
            };

            let delay = self.delay_for(&error, attempt);
            let out_of_time = start_time.elapsed() + delay >= self.policy.total_timeout;
            if !error.is_retryable() || attempt >= max_attempts || out_of_time {
                return self.give_up(attempt, error, &start_time);
            }

            log_debug!(
                attempt = attempt,
                max_attempts = max_attempts,
                delay_ms = delay.as_millis(),
                error = %error,
                "Request failed, retrying after delay"
            );
            sleep(delay).await;
        }
    }

    fn give_up<T>(&self, attempt: u32, error: LlmError, start_time: &Instant) -> LlmResult<T> {
        if error.is_retryable() {
            log_error!(
                attempts = attempt,
                total_duration_ms = start_time.elapsed().as_millis(),
                error = %error,
                "Request failed after all retry attempts"
            );
        }
        Err(error)
    }

    /// Delay before the next attempt, honouring `Retry-After` up to `max_delay`.
    fn delay_for(&self, error: &LlmError, attempt: u32) -> Duration {
        match error {
            LlmError::RateLimitExceeded {
                retry_after_seconds,
            } if *retry_after_seconds > 0 => {
                Duration::from_secs(*retry_after_seconds).min(self.policy.max_delay)
            }
            _ => self.calculate_delay(attempt),
        }
    }

    /// Calculate delay for exponential backoff
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(30) as i32;
        let delay_seconds =
            self.policy.initial_delay.as_secs_f64() * self.policy.backoff_multiplier.powi(exponent);

        let delay = Duration::from_secs_f64(delay_seconds.min(self.policy.max_delay.as_secs_f64()));

        // Up to 25% jitter below the nominal delay
        let jitter = 1.0 - fastrand::f64() * 0.25;
        Duration::from_secs_f64(delay.as_secs_f64() * jitter)
    }
}
