//! Retry with capped exponential backoff.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::RetryPolicyConfig;

/// Immutable retry policy.
///
/// Runs an operation up to `max_retries + 1` times. Between attempt `n` and
/// `n + 1` it sleeps `min(base_delay * backoff_factor^n, max_delay)`, scaled
/// by a uniform factor in `[0.5, 1.0]` when jitter is on. When attempts run
/// out the last error is returned as is.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    config: RetryPolicyConfig,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(RetryPolicyConfig::default())
    }
}

impl RetryPolicy {
    /// Create a policy from configuration.
    #[must_use]
    pub const fn new(config: RetryPolicyConfig) -> Self {
        Self { config }
    }

    /// Configuration the policy was built with.
    #[must_use]
    pub const fn config(&self) -> &RetryPolicyConfig {
        &self.config
    }

    /// Retries after the first attempt.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.config.max_retries
    }

    /// Pre-jitter delay slept after failed attempt `attempt` (zero-based).
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.config.backoff.delay_for_attempt(attempt)
    }

    /// Run `operation`, retrying every failure.
    ///
    /// # Errors
    ///
    /// The last error once every attempt failed.
    pub async fn execute<F, Fut, T, E>(&self, operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        self.execute_if(operation, |_| true).await
    }

    /// Run `operation`, retrying only failures `is_retryable` accepts.
    ///
    /// A rejected failure is returned immediately without consuming an attempt.
    ///
    /// # Errors
    ///
    /// The first non-retryable error, or the last error once every attempt failed.
    pub async fn execute_if<F, Fut, T, E, P>(
        &self,
        mut operation: F,
        is_retryable: P,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
        P: Fn(&E) -> bool,
    {
        let mut attempt: u32 = 0;
        loop {
            match operation().await {
                Ok(value) => {
                    if attempt > 0 {
                        debug!(attempt, "operation succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(e) if !is_retryable(&e) => {
                    debug!(attempt, error = %e, "non-retryable failure");
                    return Err(e);
                }
                Err(e) if attempt >= self.config.max_retries => {
                    warn!(
                        attempts = attempt + 1,
                        error = %e,
                        "retries exhausted"
                    );
                    return Err(e);
                }
                Err(e) => {
                    let delay = self.config.backoff.next_delay(attempt);
                    debug!(
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %e,
                        "attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy::new(
            RetryPolicyConfig::new()
                .with_max_retries(max_retries)
                .with_base_delay(Duration::from_millis(1))
                .with_max_delay(Duration::from_millis(5))
                .with_jitter(false),
        )
    }

    #[test]
    fn test_delays_are_capped() {
        let policy = RetryPolicy::new(
            RetryPolicyConfig::new()
                .with_base_delay(Duration::from_secs(1))
                .with_backoff_factor(2.0)
                .with_max_delay(Duration::from_secs(3)),
        );
        let delays: Vec<_> = (0..3).map(|n| policy.delay_for_attempt(n)).collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(3)
            ]
        );
    }

    #[tokio::test]
    async fn test_succeeds_after_failures() {
        let calls = AtomicU32::new(0);
        let value = fast_policy(3)
            .execute(|| async {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err("rate limited".to_string())
                } else {
                    Ok(42)
                }
            })
            .await
            .unwrap();
        assert_eq!(value, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhaustion_returns_last_error() {
        let calls = AtomicU32::new(0);
        let err = fast_policy(2)
            .execute(|| async {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(format!("failure {n}"))
            })
            .await
            .unwrap_err();
        assert_eq!(err, "failure 2");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_propagates_immediately() {
        let calls = AtomicU32::new(0);
        let err = fast_policy(5)
            .execute_if(
                || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err::<(), _>(std::io::Error::from(std::io::ErrorKind::PermissionDenied))
                },
                |e: &std::io::Error| e.kind() == std::io::ErrorKind::TimedOut,
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::PermissionDenied);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
