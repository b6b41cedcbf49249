//! Bounded retry with linear backoff.

use log::{debug, warn};
use std::future::Future;
use std::time::Duration;

/// Default number of attempts for one logical API call.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default base delay between attempts in milliseconds.
pub const DEFAULT_BASE_DELAY_MS: u64 = 1000;

/// How many times an operation is attempted and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay_ms: u64,
}

impl RetryPolicy {
    /// `max_attempts` is clamped to at least one.
    pub fn new(max_attempts: u32, base_delay_ms: u64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay_ms,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn base_delay_ms(&self) -> u64 {
        self.base_delay_ms
    }

    /// Delay to wait after the failed attempt with the given zero-based index.
    pub fn delay_for(&self, attempt_index: u32) -> Duration {
        Duration::from_millis(
            self.base_delay_ms
                .saturating_mul(u64::from(attempt_index) + 1),
        )
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_BASE_DELAY_MS)
    }
}

/// Executes an async operation with retry logic.
///
/// Attempts run strictly one after another. An error for which `is_retryable`
/// returns false is surfaced immediately; otherwise the operation is retried
/// after [`RetryPolicy::delay_for`] until attempts run out, and the last error
/// is returned.
pub async fn with_retry<F, Fut, T, E, P>(
    policy: &RetryPolicy,
    operation_name: &str,
    operation: F,
    is_retryable: P,
) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    let max_attempts = policy.max_attempts();
    let mut attempt_index = 0;

    loop {
        let error = match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => e,
        };

        if !is_retryable(&error) {
            debug!("{}: non-retryable error: {}", operation_name, error);
            return Err(error);
        }

        if attempt_index + 1 >= max_attempts {
            debug!(
                "{}: giving up after {} attempts: {}",
                operation_name, max_attempts, error
            );
            return Err(error);
        }

        let delay = policy.delay_for(attempt_index);
        warn!(
            "{}: attempt {}/{} failed ({}), retrying in {}ms...",
            operation_name,
            attempt_index + 1,
            max_attempts,
            error,
            delay.as_millis()
        );
        tokio::time::sleep(delay).await;
        attempt_index += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    #[test]
    fn test_policy_clamps_attempts() {
        let policy = RetryPolicy::new(0, 10);
        assert_eq!(policy.max_attempts(), 1);
    }

    #[test]
    fn test_policy_linear_delay() {
        let policy = RetryPolicy::new(4, 250);
        assert_eq!(policy.delay_for(0), Duration::from_millis(250));
        assert_eq!(policy.delay_for(1), Duration::from_millis(500));
        assert_eq!(policy.delay_for(2), Duration::from_millis(750));
    }

    #[test]
    fn test_policy_zero_delay() {
        let policy = RetryPolicy::new(3, 0);
        assert_eq!(policy.delay_for(5), Duration::ZERO);
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), DEFAULT_MAX_ATTEMPTS);
        assert_eq!(policy.base_delay_ms(), DEFAULT_BASE_DELAY_MS);
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_retry_success_does_not_wait() {
        let start = Instant::now();
        let result: Result<i32, String> =
            with_retry(&RetryPolicy::default(), "test", || async { Ok(42) }, |_| true).await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_retry_immediate_failure_on_non_retryable() {
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = Arc::clone(&attempts);
        let start = Instant::now();

        let result: Result<(), String> = with_retry(
            &RetryPolicy::new(5, 100),
            "test",
            || {
                let attempts = Arc::clone(&attempts_clone);
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err("bad input".to_string())
                }
            },
            |_| false,
        )
        .await;

        assert_eq!(result.unwrap_err(), "bad input");
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_retry_waits_linearly_between_attempts() {
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = Arc::clone(&attempts);
        let start = Instant::now();

        let result = with_retry(
            &RetryPolicy::new(3, 100),
            "test",
            || {
                let attempts = Arc::clone(&attempts_clone);
                async move {
                    let count = attempts.fetch_add(1, Ordering::SeqCst);
                    if count < 2 {
                        Err("connection reset".to_string())
                    } else {
                        Ok("success after retries")
                    }
                }
            },
            |_| true,
        )
        .await;

        assert_eq!(result.unwrap(), "success after retries");
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        // 100ms after the first failure, 200ms after the second
        assert_eq!(start.elapsed(), Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_retry_exhausts_attempts_and_returns_last_error() {
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = Arc::clone(&attempts);

        let result: Result<(), String> = with_retry(
            &RetryPolicy::new(4, 10),
            "test",
            || {
                let attempts = Arc::clone(&attempts_clone);
                async move {
                    let count = attempts.fetch_add(1, Ordering::SeqCst);
                    Err(format!("failure {}", count))
                }
            },
            |_| true,
        )
        .await;

        assert_eq!(result.unwrap_err(), "failure 3");
        assert_eq!(attempts.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_retry_single_attempt_policy() {
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = Arc::clone(&attempts);

        let result: Result<(), String> = with_retry(
            &RetryPolicy::new(1, 10),
            "test",
            || {
                let attempts = Arc::clone(&attempts_clone);
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err("timeout".to_string())
                }
            },
            |_| true,
        )
        .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
