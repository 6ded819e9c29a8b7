//! Scheduler and resource pool configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::BackoffConfig;
use crate::util::serde::{duration_ms, option_duration_ms};

/// Task scheduler configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Number of worker loops spawned by `start()`.
    pub worker_count: usize,
    /// Per-task execution timeout when the request sets none.
    #[serde(rename = "default_timeout_ms", with = "duration_ms")]
    pub default_timeout: Duration,
    /// Retry bound when the request sets none.
    pub default_max_retries: u32,
    /// Delay schedule between failed attempts.
    pub backoff: BackoffConfig,
    /// Upper bound on an idle worker's wait before it re-checks the queue.
    #[serde(rename = "idle_poll_interval_ms", with = "duration_ms")]
    pub idle_poll_interval: Duration,
    /// Pause after an internal worker-loop error.
    #[serde(rename = "error_pause_ms", with = "duration_ms")]
    pub error_pause: Duration,
    /// Optional cap on queued tasks.
    pub max_queue_depth: Option<usize>,
    /// Finished outcomes older than this are evicted.
    #[serde(rename = "result_ttl_ms", with = "option_duration_ms")]
    pub result_ttl: Option<Duration>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            worker_count: num_cpus::get().max(1),
            default_timeout: Duration::from_secs(300),
            default_max_retries: 3,
            backoff: BackoffConfig::default(),
            idle_poll_interval: Duration::from_millis(100),
            error_pause: Duration::from_millis(500),
            max_queue_depth: None,
            result_ttl: None,
        }
    }
}

impl SchedulerConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the worker count.
    #[must_use]
    pub const fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    /// Set the default per-task timeout.
    #[must_use]
    pub const fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Set the default retry bound.
    #[must_use]
    pub const fn with_default_max_retries(mut self, max_retries: u32) -> Self {
        self.default_max_retries = max_retries;
        self
    }

    /// Set the retry backoff.
    #[must_use]
    pub fn with_backoff(mut self, backoff: BackoffConfig) -> Self {
        self.backoff = backoff;
        self
    }

    /// Set the idle poll interval.
    #[must_use]
    pub const fn with_idle_poll_interval(mut self, interval: Duration) -> Self {
        self.idle_poll_interval = interval;
        self
    }

    /// Cap the queue depth.
    #[must_use]
    pub const fn with_max_queue_depth(mut self, depth: usize) -> Self {
        self.max_queue_depth = Some(depth);
        self
    }

    /// Evict finished outcomes after `ttl`.
    #[must_use]
    pub const fn with_result_ttl(mut self, ttl: Duration) -> Self {
        self.result_ttl = Some(ttl);
        self
    }

    /// Validate scheduler values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.worker_count == 0 {
            return Err("worker_count must be greater than 0".into());
        }
        if self.default_timeout.is_zero() {
            return Err("default_timeout_ms must be greater than 0".into());
        }
        if self.idle_poll_interval.is_zero() {
            return Err("idle_poll_interval_ms must be greater than 0".into());
        }
        if self.max_queue_depth == Some(0) {
            return Err("max_queue_depth must be greater than 0".into());
        }
        self.backoff
            .validate()
            .map_err(|e| format!("backoff invalid: {e}"))
    }
}

/// Resource pool configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourcePoolConfig {
    /// Number of resources built by `initialize`.
    pub max_size: usize,
    /// How long `acquire` waits for a free resource.
    #[serde(rename = "acquire_timeout_ms", with = "duration_ms")]
    pub acquire_timeout: Duration,
}

impl Default for ResourcePoolConfig {
    fn default() -> Self {
        Self {
            max_size: 10,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

impl ResourcePoolConfig {
    /// Validate pool values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_size == 0 {
            return Err("max_size must be greater than 0".into());
        }
        if self.acquire_timeout.is_zero() {
            return Err("acquire_timeout_ms must be greater than 0".into());
        }
        Ok(())
    }
}
