//! Name-keyed registry of shared resilience primitives.
//!
//! Call sites that protect the same dependency look its primitives up by
//! name so they share one breaker state. The `get_*` accessors create on
//! first use and return the cached instance afterwards: a different
//! configuration passed for a known name is ignored and logged. Use the
//! `register_*` methods to replace an entry on purpose.

use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use super::circuit_breaker::{CircuitBreaker, CircuitBreakerStats};
use super::error::{ResilienceError, ResilienceResult};
use super::retry::RetryPolicy;
use super::timeout::TimeoutHandler;
use crate::config::{CircuitBreakerConfig, RetryPolicyConfig};

/// Deadline used when a protection names a timeout handler nobody registered.
pub const DEFAULT_PROTECTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Which named primitives to wrap an operation in.
///
/// Layers compose outer to inner as breaker, timeout, retry: the breaker sees
/// one outcome per protected call and the deadline bounds the whole retry loop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Protection {
    circuit_breaker: Option<String>,
    retry_policy: Option<String>,
    timeout_handler: Option<String>,
}

impl Protection {
    /// No protection; the operation runs once, as is.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Guard with the named circuit breaker.
    #[must_use]
    pub fn circuit_breaker(mut self, name: impl Into<String>) -> Self {
        self.circuit_breaker = Some(name.into());
        self
    }

    /// Retry with the named policy.
    #[must_use]
    pub fn retry_policy(mut self, name: impl Into<String>) -> Self {
        self.retry_policy = Some(name.into());
        self
    }

    /// Bound with the named timeout handler.
    #[must_use]
    pub fn timeout_handler(mut self, name: impl Into<String>) -> Self {
        self.timeout_handler = Some(name.into());
        self
    }
}

/// Registry of named circuit breakers, retry policies and timeout handlers.
#[derive(Debug, Default)]
pub struct ErrorRecoveryManager {
    circuit_breakers: RwLock<HashMap<String, Arc<CircuitBreaker>>>,
    retry_policies: RwLock<HashMap<String, Arc<RetryPolicy>>>,
    timeout_handlers: RwLock<HashMap<String, Arc<TimeoutHandler>>>,
}

impl ErrorRecoveryManager {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Breaker registered under `name`, created with `config` on first use.
    pub fn get_circuit_breaker(
        &self,
        name: &str,
        config: CircuitBreakerConfig,
    ) -> Arc<CircuitBreaker> {
        if let Some(existing) = self.circuit_breakers.read().get(name) {
            if existing.config() != &config {
                warn!(breaker = %name, "circuit breaker already registered, new config ignored");
            }
            return Arc::clone(existing);
        }
        let mut breakers = self.circuit_breakers.write();
        Arc::clone(breakers.entry(name.to_string()).or_insert_with(|| {
            debug!(breaker = %name, "circuit breaker created");
            Arc::new(CircuitBreaker::new(name, config))
        }))
    }

    /// Policy registered under `name`, created with `config` on first use.
    pub fn get_retry_policy(&self, name: &str, config: RetryPolicyConfig) -> Arc<RetryPolicy> {
        if let Some(existing) = self.retry_policies.read().get(name) {
            if existing.config() != &config {
                warn!(policy = %name, "retry policy already registered, new config ignored");
            }
            return Arc::clone(existing);
        }
        let mut policies = self.retry_policies.write();
        Arc::clone(
            policies
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(RetryPolicy::new(config))),
        )
    }

    /// Handler registered under `name`, created with `timeout` on first use.
    pub fn get_timeout_handler(&self, name: &str, timeout: Duration) -> Arc<TimeoutHandler> {
        if let Some(existing) = self.timeout_handlers.read().get(name) {
            if existing.timeout() != timeout {
                warn!(handler = %name, "timeout handler already registered, new timeout ignored");
            }
            return Arc::clone(existing);
        }
        let mut handlers = self.timeout_handlers.write();
        Arc::clone(
            handlers
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(TimeoutHandler::new(timeout))),
        )
    }

    /// Create or replace the breaker under `name`. Holders of the previous
    /// instance keep using it.
    pub fn register_circuit_breaker(
        &self,
        name: &str,
        config: CircuitBreakerConfig,
    ) -> Arc<CircuitBreaker> {
        self.insert_circuit_breaker(CircuitBreaker::new(name, config))
    }

    /// Register a pre-built breaker under its own name, replacing any existing one.
    pub fn insert_circuit_breaker(&self, breaker: CircuitBreaker) -> Arc<CircuitBreaker> {
        let breaker = Arc::new(breaker);
        let replaced = self
            .circuit_breakers
            .write()
            .insert(breaker.name().to_string(), Arc::clone(&breaker));
        if replaced.is_some() {
            info!(breaker = %breaker.name(), "circuit breaker replaced");
        }
        breaker
    }

    /// Create or replace the retry policy under `name`.
    pub fn register_retry_policy(&self, name: &str, config: RetryPolicyConfig) -> Arc<RetryPolicy> {
        let policy = Arc::new(RetryPolicy::new(config));
        if self
            .retry_policies
            .write()
            .insert(name.to_string(), Arc::clone(&policy))
            .is_some()
        {
            info!(policy = %name, "retry policy replaced");
        }
        policy
    }

    /// Create or replace the timeout handler under `name`.
    pub fn register_timeout_handler(&self, name: &str, timeout: Duration) -> Arc<TimeoutHandler> {
        let handler = Arc::new(TimeoutHandler::new(timeout));
        if self
            .timeout_handlers
            .write()
            .insert(name.to_string(), Arc::clone(&handler))
            .is_some()
        {
            info!(handler = %name, "timeout handler replaced");
        }
        handler
    }

    /// Registered breaker, if any.
    #[must_use]
    pub fn circuit_breaker(&self, name: &str) -> Option<Arc<CircuitBreaker>> {
        self.circuit_breakers.read().get(name).cloned()
    }

    /// Registered retry policy, if any.
    #[must_use]
    pub fn retry_policy(&self, name: &str) -> Option<Arc<RetryPolicy>> {
        self.retry_policies.read().get(name).cloned()
    }

    /// Registered timeout handler, if any.
    #[must_use]
    pub fn timeout_handler(&self, name: &str) -> Option<Arc<TimeoutHandler>> {
        self.timeout_handlers.read().get(name).cloned()
    }

    /// Close every registered breaker.
    pub fn reset_all_breakers(&self) {
        let breakers: Vec<_> = self.circuit_breakers.read().values().cloned().collect();
        for breaker in breakers {
            breaker.reset();
        }
    }

    /// Stats of every registered breaker, sorted by name.
    #[must_use]
    pub fn breaker_stats(&self) -> Vec<CircuitBreakerStats> {
        let breakers: Vec<_> = self.circuit_breakers.read().values().cloned().collect();
        let mut stats: Vec<_> = breakers.iter().map(|b| b.stats()).collect();
        stats.sort_by(|a, b| a.name.cmp(&b.name));
        stats
    }

    /// Run `operation` wrapped in the primitives `protection` names.
    ///
    /// Names not registered yet are created with default configuration.
    ///
    /// # Errors
    ///
    /// - [`ResilienceError::CircuitOpen`] if the breaker rejected the call
    /// - [`ResilienceError::Timeout`] if the deadline cut the call short
    /// - [`ResilienceError::Operation`] with the last operation error
    pub async fn execute_with_protection<F, Fut, T, E>(
        &self,
        mut operation: F,
        protection: &Protection,
    ) -> ResilienceResult<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let breaker = protection
            .circuit_breaker
            .as_deref()
            .map(|name| self.circuit_breaker_or_default(name));
        let retry = protection
            .retry_policy
            .as_deref()
            .map(|name| self.retry_policy_or_default(name));
        let timeout = protection
            .timeout_handler
            .as_deref()
            .map(|name| self.timeout_handler_or_default(name));

        if let Some(breaker) = &breaker {
            breaker.try_acquire::<E>()?;
        }

        let attempts = async {
            match &retry {
                Some(policy) => policy.execute(&mut operation).await,
                None => operation().await,
            }
        };
        let result = match &timeout {
            Some(handler) => handler.execute(attempts).await,
            None => attempts.await.map_err(ResilienceError::Operation),
        };

        if let Some(breaker) = &breaker {
            match &result {
                Ok(_) => breaker.record_success(),
                Err(_) => breaker.record_failure(),
            }
        }
        result
    }

    fn circuit_breaker_or_default(&self, name: &str) -> Arc<CircuitBreaker> {
        self.circuit_breaker(name)
            .unwrap_or_else(|| self.get_circuit_breaker(name, CircuitBreakerConfig::default()))
    }

    fn retry_policy_or_default(&self, name: &str) -> Arc<RetryPolicy> {
        self.retry_policy(name)
            .unwrap_or_else(|| self.get_retry_policy(name, RetryPolicyConfig::default()))
    }

    fn timeout_handler_or_default(&self, name: &str) -> Arc<TimeoutHandler> {
        self.timeout_handler(name)
            .unwrap_or_else(|| self.get_timeout_handler(name, DEFAULT_PROTECTION_TIMEOUT))
    }
}
