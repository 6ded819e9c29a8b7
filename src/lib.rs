//! # Prometheus Dispatch
//!
//! Concurrency backbone for AI agent workloads on the Prometheus AI Platform.
//!
//! An agent runtime constantly dispatches small units of work: tool calls,
//! sub-agent invocations, LLM provider requests. These need bounded
//! parallelism, priority ordering, and tolerance of transient failures from
//! flaky downstream services. This crate provides those pieces in-process,
//! on a single tokio runtime.
//!
//! ## Key Features
//!
//! - **Priority Scheduling**: a single queue ordered by `(priority rank, submission sequence)`
//!   served by a fixed pool of cooperative workers
//! - **Per-Task Retry and Timeout**: failed attempts are retried with capped exponential backoff
//! - **Fan-Out Completion**: any number of callers can wait on the same task id
//! - **Resource Pooling**: bounded FIFO pool of opaque handles with waiting acquisition
//! - **Resilience Layer**: circuit breaker, retry policy and timeout handler, composable
//!   through a name-keyed `ErrorRecoveryManager`
//!
//! ## TaskScheduler
//!
//! ```rust,ignore
//! use prometheus_dispatch::config::SchedulerConfig;
//! use prometheus_dispatch::core::{TaskRequest, TaskScheduler};
//! use prometheus_dispatch::util::TaskPriority;
//!
//! let scheduler = TaskScheduler::<i64>::new(SchedulerConfig::new().with_worker_count(3))?;
//! scheduler.start()?;
//!
//! scheduler.schedule(
//!     TaskRequest::new("sum-1", "sum", || async { Ok(10 + 20) })
//!         .with_priority(TaskPriority::High),
//! )?;
//! let value = scheduler.wait_for_task("sum-1", None).await?;
//! assert_eq!(value, 30);
//!
//! scheduler.stop().await;
//! ```
//!
//! ## Resilience
//!
//! ```rust,ignore
//! use prometheus_dispatch::config::CircuitBreakerConfig;
//! use prometheus_dispatch::resilience::{ErrorRecoveryManager, Protection};
//!
//! let manager = ErrorRecoveryManager::new();
//! manager.get_circuit_breaker("llm", CircuitBreakerConfig::new().with_failure_threshold(3));
//!
//! let protection = Protection::new()
//!     .circuit_breaker("llm")
//!     .timeout_handler("llm")
//!     .retry_policy("llm");
//! let reply = manager
//!     .execute_with_protection(|| provider.complete(prompt.clone()), &protection)
//!     .await?;
//! ```
//!
//! For complete examples, see:
//! - `tests/scheduler_test.rs` - Scheduler integration tests
//! - `tests/resilience_test.rs` - Resilience composition tests

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Task scheduling, task operations and resource pooling.
pub mod core;
/// Configuration models for the scheduler, pool and resilience primitives.
pub mod config;
/// Builders to construct dispatch components from configuration.
pub mod builders;
/// Circuit breaker, retry, timeout and the recovery manager.
pub mod resilience;
/// Observability-facing API surface.
pub mod runtime;
/// Shared utilities.
pub mod util;
