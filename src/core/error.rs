//! Error types for scheduler and resource pool operations.

use std::time::Duration;

use thiserror::Error;

use crate::util::serde::TaskId;

/// Errors produced by the task scheduler.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchedulerError {
    /// Waiting on a task exceeded the caller's wait timeout. The task may
    /// still be running.
    #[error("timed out after {waited:?} waiting for task {task_id}")]
    WaitTimeout {
        /// Task that was being waited on.
        task_id: TaskId,
        /// How long the caller waited.
        waited: Duration,
    },
    /// The task exhausted its retry budget. Only the rendered last error
    /// survives.
    #[error("task {task_id} failed: {error}")]
    ExecutionFailed {
        /// Failed task.
        task_id: TaskId,
        /// Rendered last error.
        error: String,
    },
    /// The task was interrupted because the scheduler stopped.
    #[error("task {0} was cancelled")]
    Cancelled(TaskId),
    /// No task is registered under this id.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
    /// A task with this id is still pending.
    #[error("task {0} is already scheduled")]
    DuplicateTask(TaskId),
    /// The queue reached its configured depth.
    #[error("queue full: {0}")]
    QueueFull(String),
    /// `start()` was called while a previous `stop()` is still draining workers.
    #[error("scheduler is still stopping")]
    Stopping,
    /// Configuration rejected by validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Inconsistent internal state detected by a worker.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Errors produced by [`crate::core::ResourcePool`].
#[derive(Debug, Error)]
pub enum PoolError {
    /// No resource became available in time.
    #[error("timed out after {0:?} acquiring a resource")]
    AcquireTimeout(Duration),
    /// `acquire` was called before `initialize`.
    #[error("resource pool is not initialized")]
    NotInitialized,
    /// `initialize` was called twice.
    #[error("resource pool is already initialized")]
    AlreadyInitialized,
    /// Pool configuration rejected by validation.
    #[error("invalid pool configuration: {0}")]
    InvalidConfig(String),
    /// The resource factory failed while filling the pool.
    #[error("resource factory failed creating resource {index}")]
    Factory {
        /// Zero-based index of the resource being created.
        index: usize,
        /// Factory error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

/// Application-facing result using anyhow for task operations.
pub type AppResult<T> = Result<T, anyhow::Error>;
