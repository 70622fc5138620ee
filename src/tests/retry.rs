use crate::error::LlmError;
use crate::retry::{RetryExecutor, RetryPolicy};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

#[cfg(test)]
mod tests {
    use super::*;

    // Helper to create fast test retry policy to prevent slow tests
    fn create_fast_test_retry_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            initial_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(50),
            backoff_multiplier: 2.0,
            total_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_millis(200),
        }
    }

    // Unit Tests for RetryPolicy
    //
    // UNIT UNDER TEST: RetryPolicy
    //
    // BUSINESS RESPONSIBILITY:
    //   - Translate a provider max_retries setting into attempt limits
    //   - Provide SDK-like backoff timing defaults
    //
    // TEST COVERAGE:
    //   - Default policy equals two retries
    //   - Attempt count derivation

    #[test]
    fn test_default_policy_allows_two_retries() {
        // Arrange
        let policy = RetryPolicy::default();

        // Act & Assert
        assert_eq!(policy.max_attempts, 3, "Two retries means three attempts");
        assert_eq!(policy.initial_delay, Duration::from_millis(500));
        assert_eq!(policy.max_delay, Duration::from_secs(8));
        assert_eq!(policy.request_timeout, Duration::from_secs(600));
    }

    #[test]
    fn test_zero_retries_means_single_attempt() {
        assert_eq!(RetryPolicy::from_max_retries(0).max_attempts, 1);
        assert_eq!(RetryPolicy::from_max_retries(u32::MAX).max_attempts, u32::MAX);
    }

    // Unit Tests for RetryExecutor
    //
    // UNIT UNDER TEST: RetryExecutor
    //
    // BUSINESS RESPONSIBILITY:
    //   - Retry transient failures with exponential backoff
    //   - Surface non-retryable failures immediately
    //   - Bound each attempt by the request timeout
    //
    // TEST COVERAGE:
    //   - Success after transient failures
    //   - Immediate return of client errors
    //   - Attempt exhaustion
    //   - Per-attempt timeout
    //   - Delay growth and cap

    #[tokio::test]
    async fn test_retries_transient_failures_until_success() {
        let executor = RetryExecutor::new(create_fast_test_retry_policy(3));
        let attempts = AtomicU32::new(0);

        let result = executor
            .execute(|| async {
                let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
                if attempt < 3 {
                    Err(LlmError::provider_status(503, "overloaded"))
                } else {
                    Ok("done")
                }
            })
            .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_error_returns_immediately() {
        let executor = RetryExecutor::new(create_fast_test_retry_policy(5));
        let attempts = AtomicU32::new(0);

        let result: Result<(), LlmError> = executor
            .execute(|| async {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err(LlmError::authentication_failed("bad key"))
            })
            .await;

        assert!(matches!(result, Err(LlmError::AuthenticationFailed { .. })));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let executor = RetryExecutor::new(create_fast_test_retry_policy(2));
        let attempts = AtomicU32::new(0);

        let result: Result<(), LlmError> = executor
            .execute(|| async {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err(LlmError::provider_status(500, "still broken"))
            })
            .await;

        assert!(matches!(result, Err(LlmError::RequestFailed { status: Some(500), .. })));
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_slow_attempt_times_out() {
        let executor = RetryExecutor::new(create_fast_test_retry_policy(1));

        let result: Result<(), LlmError> = executor
            .execute(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                Ok(())
            })
            .await;

        assert!(matches!(result, Err(LlmError::Timeout { .. })));
    }

    #[test]
    fn test_delay_grows_and_is_capped() {
        let executor = RetryExecutor::new(create_fast_test_retry_policy(5));

        let first = executor.calculate_delay(1);
        let third = executor.calculate_delay(3);
        let tenth = executor.calculate_delay(10);

        // 25% jitter below nominal
        assert!(first <= Duration::from_millis(10) && first >= Duration::from_millis(7));
        assert!(third <= Duration::from_millis(40) && third >= Duration::from_millis(29));
        assert!(tenth <= Duration::from_millis(50));
    }
}
