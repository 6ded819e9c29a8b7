//! Configuration models for the scheduler, resource pool and resilience layer.

mod resilience;
mod scheduler;

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use resilience::{BackoffConfig, CircuitBreakerConfig, ResilienceConfig, RetryPolicyConfig};
pub use scheduler::{ResourcePoolConfig, SchedulerConfig};

/// Prefix of every environment variable read by [`DispatchConfig::from_env`].
pub const ENV_PREFIX: &str = "DISPATCH_";

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Task scheduler settings.
    pub scheduler: SchedulerConfig,
    /// Resource pool settings.
    pub resource_pool: ResourcePoolConfig,
    /// Named resilience primitives to pre-register.
    pub resilience: ResilienceConfig,
}

impl DispatchConfig {
    /// Validate every section.
    ///
    /// # Errors
    ///
    /// Returns the first invalid value, prefixed with its section.
    pub fn validate(&self) -> Result<(), String> {
        self.scheduler
            .validate()
            .map_err(|e| format!("scheduler invalid: {e}"))?;
        self.resource_pool
            .validate()
            .map_err(|e| format!("resource_pool invalid: {e}"))?;
        self.resilience
            .validate()
            .map_err(|e| format!("resilience invalid: {e}"))
    }

    /// Parse configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Returns a parse or validation message.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Build configuration from `DISPATCH_*` environment variables, loading a
    /// `.env` file first when one exists. Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns a message naming the variable that failed to parse, or the
    /// validation failure.
    pub fn from_env() -> Result<Self, String> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup using the
    /// `DISPATCH_*` variable names.
    ///
    /// # Errors
    ///
    /// Same as [`DispatchConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));
        let mut cfg = Self::default();

        if let Some(v) = parse_var(&read, "WORKER_COUNT")? {
            cfg.scheduler.worker_count = v;
        }
        if let Some(v) = parse_var(&read, "DEFAULT_TIMEOUT_MS")? {
            cfg.scheduler.default_timeout = Duration::from_millis(v);
        }
        if let Some(v) = parse_var(&read, "DEFAULT_MAX_RETRIES")? {
            cfg.scheduler.default_max_retries = v;
        }
        if let Some(v) = parse_var(&read, "BACKOFF_BASE_MS")? {
            cfg.scheduler.backoff.base_delay = Duration::from_millis(v);
        }
        if let Some(v) = parse_var(&read, "BACKOFF_MAX_MS")? {
            cfg.scheduler.backoff.max_delay = Duration::from_millis(v);
        }
        if let Some(v) = parse_var(&read, "BACKOFF_FACTOR")? {
            cfg.scheduler.backoff.backoff_factor = v;
        }
        if let Some(v) = parse_var(&read, "BACKOFF_JITTER")? {
            cfg.scheduler.backoff.jitter = v;
        }
        if let Some(v) = parse_var(&read, "MAX_QUEUE_DEPTH")? {
            cfg.scheduler.max_queue_depth = Some(v);
        }
        if let Some(v) = parse_var(&read, "RESULT_TTL_MS")? {
            cfg.scheduler.result_ttl = Some(Duration::from_millis(v));
        }
        if let Some(v) = parse_var(&read, "POOL_MAX_SIZE")? {
            cfg.resource_pool.max_size = v;
        }
        if let Some(v) = parse_var(&read, "POOL_ACQUIRE_TIMEOUT_MS")? {
            cfg.resource_pool.acquire_timeout = Duration::from_millis(v);
        }

        cfg.validate()?;
        Ok(cfg)
    }
}

fn parse_var<T, F>(read: &F, name: &str) -> Result<Option<T>, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match read(name) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| format!("{ENV_PREFIX}{name}: {e}")),
        None => Ok(None),
    }
}
