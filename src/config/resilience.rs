//! Resilience primitive configuration: backoff, retry policies and circuit breakers.

use std::collections::HashMap;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::util::serde::duration_ms;

/// Exponential backoff shared by [`crate::resilience::RetryPolicy`] and the
/// scheduler's internal retry path.
///
/// The delay before retry `n` (zero-based) is
/// `min(base_delay * backoff_factor^n, max_delay)`; with `jitter` enabled the
/// slept delay is that value scaled by a uniform factor in `[0.5, 1.0]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackoffConfig {
    /// Delay before the first retry.
    #[serde(rename = "base_delay_ms", with = "duration_ms")]
    pub base_delay: Duration,
    /// Upper bound for any single delay.
    #[serde(rename = "max_delay_ms", with = "duration_ms")]
    pub max_delay: Duration,
    /// Multiplier applied per attempt.
    pub backoff_factor: f64,
    /// Randomize delays to avoid synchronized retries.
    pub jitter: bool,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            backoff_factor: 2.0,
            jitter: false,
        }
    }
}

impl BackoffConfig {
    /// Pre-jitter delay before retry `attempt` (zero-based).
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let raw = self.base_delay.as_secs_f64() * self.backoff_factor.powi(exponent);
        let capped = raw.min(self.max_delay.as_secs_f64());
        Duration::try_from_secs_f64(capped).unwrap_or(self.max_delay)
    }

    /// Delay actually slept before retry `attempt`, jitter applied if enabled.
    #[must_use]
    pub fn next_delay(&self, attempt: u32) -> Duration {
        let delay = self.delay_for_attempt(attempt);
        if self.jitter {
            delay.mul_f64(rand::rng().random_range(0.5..=1.0))
        } else {
            delay
        }
    }

    /// Validate backoff values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if !self.backoff_factor.is_finite() || self.backoff_factor < 1.0 {
            return Err("backoff_factor must be a finite value >= 1.0".into());
        }
        if self.base_delay > self.max_delay {
            return Err("base_delay_ms must not exceed max_delay_ms".into());
        }
        Ok(())
    }
}

/// Retry policy configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicyConfig {
    /// Retries after the first attempt; total attempts are `max_retries + 1`.
    pub max_retries: u32,
    /// Delay schedule between attempts.
    #[serde(flatten)]
    pub backoff: BackoffConfig,
}

impl Default for RetryPolicyConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff: BackoffConfig {
                jitter: true,
                ..BackoffConfig::default()
            },
        }
    }
}

impl RetryPolicyConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the retry bound.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the delay before the first retry.
    #[must_use]
    pub const fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.backoff.base_delay = base_delay;
        self
    }

    /// Set the delay ceiling.
    #[must_use]
    pub const fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.backoff.max_delay = max_delay;
        self
    }

    /// Set the exponential multiplier.
    #[must_use]
    pub const fn with_backoff_factor(mut self, factor: f64) -> Self {
        self.backoff.backoff_factor = factor;
        self
    }

    /// Enable or disable jitter.
    #[must_use]
    pub const fn with_jitter(mut self, jitter: bool) -> Self {
        self.backoff.jitter = jitter;
        self
    }

    /// Validate retry values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        self.backoff.validate()
    }
}

/// Circuit breaker configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures in CLOSED before the circuit opens.
    pub failure_threshold: u32,
    /// Successes in HALF_OPEN before the circuit closes.
    pub success_threshold: u32,
    /// Time spent OPEN before a trial call is allowed.
    #[serde(rename = "timeout_ms", with = "duration_ms")]
    pub timeout: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            success_threshold: 2,
            timeout: Duration::from_secs(60),
        }
    }
}

impl CircuitBreakerConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the failure threshold.
    #[must_use]
    pub const fn with_failure_threshold(mut self, threshold: u32) -> Self {
        self.failure_threshold = threshold;
        self
    }

    /// Set the half-open success threshold.
    #[must_use]
    pub const fn with_success_threshold(mut self, threshold: u32) -> Self {
        self.success_threshold = threshold;
        self
    }

    /// Set the open timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validate breaker values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.failure_threshold == 0 {
            return Err("failure_threshold must be greater than 0".into());
        }
        if self.success_threshold == 0 {
            return Err("success_threshold must be greater than 0".into());
        }
        if self.timeout.is_zero() {
            return Err("timeout_ms must be greater than 0".into());
        }
        Ok(())
    }
}

/// Named resilience primitives registered up front.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResilienceConfig {
    /// Circuit breakers keyed by dependency name.
    pub circuit_breakers: HashMap<String, CircuitBreakerConfig>,
    /// Retry policies keyed by name.
    pub retry_policies: HashMap<String, RetryPolicyConfig>,
    /// Timeout handler deadlines in milliseconds, keyed by name.
    pub timeouts_ms: HashMap<String, u64>,
}

impl ResilienceConfig {
    /// Validate every named entry.
    ///
    /// # Errors
    ///
    /// Returns the first invalid entry with its name.
    pub fn validate(&self) -> Result<(), String> {
        for (name, breaker) in &self.circuit_breakers {
            breaker
                .validate()
                .map_err(|e| format!("circuit breaker `{name}` invalid: {e}"))?;
        }
        for (name, policy) in &self.retry_policies {
            policy
                .validate()
                .map_err(|e| format!("retry policy `{name}` invalid: {e}"))?;
        }
        for (name, timeout) in &self.timeouts_ms {
            if *timeout == 0 {
                return Err(format!("timeout `{name}` must be greater than 0"));
            }
        }
        Ok(())
    }
}
