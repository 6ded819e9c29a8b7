//! Failure-counting circuit breaker.
//!
//! | from      | trigger                                   | to        |
//! |-----------|-------------------------------------------|-----------|
//! | closed    | `failure_count >= failure_threshold`      | open      |
//! | closed    | success                                   | closed, failures reset |
//! | open      | `timeout` elapsed since last failure      | half-open, successes reset |
//! | half-open | failure                                   | open      |
//! | half-open | `success_count >= success_threshold`      | closed, failures reset |
//!
//! The open to half-open transition is lazy: it happens on the next state
//! query or call, never on a timer. All reads and writes of one breaker go
//! through a single lock; the protected operation runs outside it.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::error::{ResilienceError, ResilienceResult};
use crate::config::CircuitBreakerConfig;
use crate::util::clock::{Clock, SystemClock};

/// Breaker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitState {
    /// Calls flow through.
    Closed,
    /// Calls are rejected without being attempted.
    Open,
    /// Calls flow through on probation.
    HalfOpen,
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "CLOSED"),
            Self::Open => write!(f, "OPEN"),
            Self::HalfOpen => write!(f, "HALF_OPEN"),
        }
    }
}

/// Serializable breaker snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitBreakerStats {
    /// Breaker name.
    pub name: String,
    /// State after the lazy open timeout check.
    pub state: CircuitState,
    /// Consecutive failures counted toward opening.
    pub failure_count: u32,
    /// Successes counted while half-open.
    pub success_count: u32,
    /// Calls that were attempted.
    pub total_calls: u64,
    /// Calls rejected while open.
    pub rejected_calls: u64,
    /// Milliseconds since the last recorded failure.
    pub since_last_failure_ms: Option<u64>,
}

#[derive(Debug)]
struct BreakerState {
    state: CircuitState,
    failure_count: u32,
    success_count: u32,
    last_failure_time: Option<Instant>,
    total_calls: u64,
    rejected_calls: u64,
}

impl BreakerState {
    const fn closed() -> Self {
        Self {
            state: CircuitState::Closed,
            failure_count: 0,
            success_count: 0,
            last_failure_time: None,
            total_calls: 0,
            rejected_calls: 0,
        }
    }
}

/// Circuit breaker guarding one downstream dependency.
pub struct CircuitBreaker {
    name: String,
    config: CircuitBreakerConfig,
    clock: Arc<dyn Clock>,
    inner: Mutex<BreakerState>,
}

impl fmt::Debug for CircuitBreaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircuitBreaker")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("state", &self.inner.lock().state)
            .finish_non_exhaustive()
    }
}

impl CircuitBreaker {
    /// Create a closed breaker reading the system clock.
    #[must_use]
    pub fn new(name: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        Self::with_clock(name, config, SystemClock)
    }

    /// Create a closed breaker reading `clock`.
    #[must_use]
    pub fn with_clock(
        name: impl Into<String>,
        config: CircuitBreakerConfig,
        clock: impl Clock,
    ) -> Self {
        Self {
            name: name.into(),
            config,
            clock: Arc::new(clock),
            inner: Mutex::new(BreakerState::closed()),
        }
    }

    /// Breaker name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Configuration the breaker was built with.
    #[must_use]
    pub const fn config(&self) -> &CircuitBreakerConfig {
        &self.config
    }

    /// Current state, moving open to half-open if the open timeout elapsed.
    #[must_use]
    pub fn state(&self) -> CircuitState {
        let mut inner = self.inner.lock();
        self.refresh(&mut inner);
        inner.state
    }

    /// Run `operation` unless the breaker is open, recording its outcome.
    ///
    /// # Errors
    ///
    /// - [`ResilienceError::CircuitOpen`] without invoking `operation`
    /// - [`ResilienceError::Operation`] with the operation's own error
    pub async fn call<F, Fut, T, E>(&self, operation: F) -> ResilienceResult<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.try_acquire::<E>()?;
        match operation().await {
            Ok(value) => {
                self.record_success();
                Ok(value)
            }
            Err(e) => {
                self.record_failure();
                Err(ResilienceError::Operation(e))
            }
        }
    }

    /// Admit a call or reject it with `CircuitOpen`.
    pub(crate) fn try_acquire<E>(&self) -> ResilienceResult<(), E> {
        let mut inner = self.inner.lock();
        self.refresh(&mut inner);
        if inner.state == CircuitState::Open {
            inner.rejected_calls += 1;
            debug!(breaker = %self.name, "call rejected, circuit open");
            return Err(ResilienceError::CircuitOpen {
                name: self.name.clone(),
            });
        }
        inner.total_calls += 1;
        Ok(())
    }

    /// Record a successful call made outside [`CircuitBreaker::call`].
    pub fn record_success(&self) {
        let mut inner = self.inner.lock();
        self.refresh(&mut inner);
        match inner.state {
            CircuitState::Closed => inner.failure_count = 0,
            CircuitState::HalfOpen => {
                inner.success_count += 1;
                if inner.success_count >= self.config.success_threshold {
                    inner.state = CircuitState::Closed;
                    inner.failure_count = 0;
                    inner.success_count = 0;
                    info!(breaker = %self.name, "circuit closed");
                }
            }
            CircuitState::Open => {
                debug!(breaker = %self.name, "success recorded while open, ignored");
            }
        }
    }

    /// Record a failed call made outside [`CircuitBreaker::call`].
    pub fn record_failure(&self) {
        let mut inner = self.inner.lock();
        self.refresh(&mut inner);
        inner.failure_count = inner.failure_count.saturating_add(1);
        inner.last_failure_time = Some(self.clock.now());
        match inner.state {
            CircuitState::Closed => {
                if inner.failure_count >= self.config.failure_threshold {
                    inner.state = CircuitState::Open;
                    warn!(
                        breaker = %self.name,
                        failures = inner.failure_count,
                        "circuit opened"
                    );
                }
            }
            CircuitState::HalfOpen => {
                inner.state = CircuitState::Open;
                inner.success_count = 0;
                warn!(breaker = %self.name, "probe failed, circuit reopened");
            }
            CircuitState::Open => {}
        }
    }

    /// Force the breaker closed with zeroed counts.
    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        let previous = inner.state;
        inner.state = CircuitState::Closed;
        inner.failure_count = 0;
        inner.success_count = 0;
        inner.last_failure_time = None;
        if previous != CircuitState::Closed {
            info!(breaker = %self.name, from = %previous, "circuit reset");
        }
    }

    /// Snapshot of state and counters.
    #[must_use]
    pub fn stats(&self) -> CircuitBreakerStats {
        let mut inner = self.inner.lock();
        self.refresh(&mut inner);
        let now = self.clock.now();
        CircuitBreakerStats {
            name: self.name.clone(),
            state: inner.state,
            failure_count: inner.failure_count,
            success_count: inner.success_count,
            total_calls: inner.total_calls,
            rejected_calls: inner.rejected_calls,
            since_last_failure_ms: inner.last_failure_time.map(|at| {
                u64::try_from(now.saturating_duration_since(at).as_millis()).unwrap_or(u64::MAX)
            }),
        }
    }

    fn refresh(&self, inner: &mut BreakerState) {
        if inner.state != CircuitState::Open {
            return;
        }
        let elapsed = inner
            .last_failure_time
            .map_or(self.config.timeout, |at| self.clock.now().saturating_duration_since(at));
        if elapsed >= self.config.timeout {
            inner.state = CircuitState::HalfOpen;
            inner.success_count = 0;
            info!(breaker = %self.name, "circuit half-open");
        }
    }
}
