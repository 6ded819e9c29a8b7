//! Scheduler and per-task statistics snapshots.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::util::serde::{duration_ms, TaskId, TaskPriority};

/// Worker lifecycle of a [`crate::core::TaskScheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    /// Created, workers never started.
    New,
    /// Workers are servicing the queue.
    Running,
    /// Cancellation requested, waiting for workers to exit.
    Stopping,
    /// All workers exited.
    Stopped,
}

/// Where a task is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Waiting in the queue.
    Queued,
    /// Being executed by a worker.
    Running,
    /// Failed an attempt and waiting out its backoff delay.
    Retrying,
    /// Finished successfully.
    Completed,
    /// Exhausted its retries.
    Failed,
    /// Interrupted by `stop()`.
    Cancelled,
}

impl TaskStatus {
    /// True while the task has not reached a final outcome.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Queued | Self::Running | Self::Retrying)
    }
}

/// Scheduler-wide counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerStats {
    /// True while workers are running.
    pub running: bool,
    /// Worker lifecycle state.
    pub state: LifecycleState,
    /// Configured worker count.
    pub worker_count: usize,
    /// Tasks waiting in the queue.
    pub queue_depth: usize,
    /// Tasks currently held by a worker (executing or backing off).
    pub active_tasks: usize,
    /// Tasks that finished successfully.
    pub completed_tasks: u64,
    /// Tasks that exhausted their retries.
    pub failed_tasks: u64,
    /// Tasks interrupted by `stop()`.
    pub cancelled_tasks: u64,
    /// Failed attempts that were scheduled for another try.
    pub retried_attempts: u64,
    /// `completed / (completed + failed)`, `0.0` before anything finished.
    pub success_rate: f64,
}

/// Counters for a single task id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStats {
    /// Task identifier.
    pub task_id: TaskId,
    /// Display name.
    pub name: String,
    /// Queue priority.
    pub priority: TaskPriority,
    /// Current status.
    pub status: TaskStatus,
    /// Executions started.
    pub attempts: u32,
    /// Successful executions.
    pub successes: u32,
    /// Failed executions (errors, timeouts, panics).
    pub failures: u32,
    /// Wall time spent executing across attempts.
    #[serde(rename = "total_execution_time_ms", with = "duration_ms")]
    pub total_execution_time: Duration,
    /// Rendered error of every failed attempt, oldest first.
    pub errors: Vec<String>,
    /// Submission time in milliseconds since epoch.
    pub submitted_at_ms: u128,
}
