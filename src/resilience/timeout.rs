//! Deadline enforcement for async and blocking operations.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use tracing::{error, warn};

use super::error::{ResilienceError, ResilienceResult};

/// Best-effort callback run when a deadline is exceeded.
///
/// Its errors are logged and its panics caught; neither reaches the caller.
pub type OnTimeout = Box<dyn FnOnce() -> anyhow::Result<()> + Send>;

/// Runs operations under a default deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutHandler {
    timeout: Duration,
}

impl TimeoutHandler {
    /// Create a handler with a default deadline.
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Default deadline.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run `future` under the default deadline.
    ///
    /// # Errors
    ///
    /// - [`ResilienceError::Timeout`] if the deadline elapsed first
    /// - [`ResilienceError::Operation`] with the operation's own error
    pub async fn execute<Fut, T, E>(&self, future: Fut) -> ResilienceResult<T, E>
    where
        Fut: Future<Output = Result<T, E>>,
    {
        self.execute_with(future, None, None).await
    }

    /// Run `future` under `timeout` (or the default), calling `on_timeout`
    /// if it expires.
    ///
    /// # Errors
    ///
    /// Same as [`TimeoutHandler::execute`].
    pub async fn execute_with<Fut, T, E>(
        &self,
        future: Fut,
        timeout: Option<Duration>,
        on_timeout: Option<OnTimeout>,
    ) -> ResilienceResult<T, E>
    where
        Fut: Future<Output = Result<T, E>>,
    {
        let timeout = timeout.unwrap_or(self.timeout);
        match tokio::time::timeout(timeout, future).await {
            Ok(result) => result.map_err(ResilienceError::Operation),
            Err(_) => {
                warn!(timeout_ms = duration_ms(timeout), "operation timed out");
                if let Some(callback) = on_timeout {
                    run_callback(callback);
                }
                Err(ResilienceError::Timeout { timeout })
            }
        }
    }

    /// Run a blocking `operation` on the blocking thread pool under the
    /// default deadline.
    ///
    /// On expiry the caller gets `Timeout` immediately; the blocking thread
    /// itself cannot be interrupted and runs to completion in the background.
    /// A panic inside `operation` is resumed on the caller.
    ///
    /// # Errors
    ///
    /// Same as [`TimeoutHandler::execute`].
    pub async fn execute_blocking<F, T, E>(&self, operation: F) -> ResilienceResult<T, E>
    where
        F: FnOnce() -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        self.execute_blocking_with(operation, None, None).await
    }

    /// Blocking counterpart of [`TimeoutHandler::execute_with`].
    ///
    /// # Errors
    ///
    /// Same as [`TimeoutHandler::execute`].
    pub async fn execute_blocking_with<F, T, E>(
        &self,
        operation: F,
        timeout: Option<Duration>,
        on_timeout: Option<OnTimeout>,
    ) -> ResilienceResult<T, E>
    where
        F: FnOnce() -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        let timeout = timeout.unwrap_or(self.timeout);
        let handle = tokio::task::spawn_blocking(operation);
        match tokio::time::timeout(timeout, handle).await {
            Ok(Ok(result)) => result.map_err(ResilienceError::Operation),
            Ok(Err(join_error)) => {
                if join_error.is_panic() {
                    std::panic::resume_unwind(join_error.into_panic());
                }
                // The runtime is shutting down; nothing finished in time.
                Err(ResilienceError::Timeout { timeout })
            }
            Err(_) => {
                warn!(
                    timeout_ms = duration_ms(timeout),
                    "blocking operation timed out"
                );
                if let Some(callback) = on_timeout {
                    run_callback(callback);
                }
                Err(ResilienceError::Timeout { timeout })
            }
        }
    }
}

fn run_callback(callback: OnTimeout) {
    match std::panic::catch_unwind(AssertUnwindSafe(callback)) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %e, "on_timeout callback failed"),
        Err(_) => error!("on_timeout callback panicked"),
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
