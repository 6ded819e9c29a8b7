//! Priority task scheduler with a fixed pool of cooperative workers.
//!
//! Tasks enter a single shared priority queue ordered by
//! `(priority rank, submission sequence)`. Each worker pops the next task,
//! runs it under the task's timeout, and on failure puts it back after a
//! backoff delay until its retry budget is spent.
//!
//! # Design
//!
//! - **One lock**: queue, task outcomes and counters live behind a single
//!   `parking_lot::Mutex`, held only for short critical sections. Operations
//!   always execute outside it.
//! - **No busy polling**: idle workers park on a `Notify` that `schedule`
//!   signals; a bounded poll interval is only a fallback.
//! - **Fan-out completion**: every task publishes its outcome on a `watch`
//!   channel, so any number of callers can wait on the same id.
//! - **Cooperative stop**: `stop()` cancels a `CancellationToken` observed at
//!   every suspension point. A task interrupted mid-execution is recorded as
//!   cancelled so its waiters are released. The last worker to exit marks the
//!   scheduler stopped, whether or not anyone is still awaiting `stop()`.
//!
//! # Example
//!
//! ```rust,ignore
//! use prometheus_dispatch::config::SchedulerConfig;
//! use prometheus_dispatch::core::{TaskRequest, TaskScheduler};
//! use prometheus_dispatch::util::TaskPriority;
//!
//! let scheduler = TaskScheduler::new(SchedulerConfig::new().with_worker_count(3))?;
//! scheduler.start()?;
//!
//! scheduler.schedule(
//!     TaskRequest::new("sum", "add numbers", || async { Ok(10 + 20) })
//!         .with_priority(TaskPriority::High),
//! )?;
//! let total = scheduler.wait_for_task("sum", None).await?;
//! assert_eq!(total, 30);
//!
//! scheduler.stop().await;
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::FutureExt;
use parking_lot::Mutex;
use tokio::sync::{watch, Notify};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::queue::{QueuedTask, TaskQueue};
use super::stats::{LifecycleState, SchedulerStats, TaskStats, TaskStatus};
use super::{SchedulerError, TaskOperation};
use crate::config::SchedulerConfig;
use crate::util::clock::now_ms;
use crate::util::serde::{TaskId, TaskPriority};

/// A unit of work submitted to [`TaskScheduler::schedule`].
pub struct TaskRequest<T> {
    id: TaskId,
    name: String,
    operation: Arc<dyn TaskOperation<T>>,
    priority: TaskPriority,
    timeout: Option<Duration>,
    max_retries: Option<u32>,
}

impl<T> TaskRequest<T>
where
    T: Send + 'static,
{
    /// Create a request at `Normal` priority with the scheduler's default
    /// timeout and retry bound.
    pub fn new<O>(id: impl Into<TaskId>, name: impl Into<String>, operation: O) -> Self
    where
        O: TaskOperation<T>,
    {
        Self {
            id: id.into(),
            name: name.into(),
            operation: Arc::new(operation),
            priority: TaskPriority::Normal,
            timeout: None,
            max_retries: None,
        }
    }

    /// Create a request with a random UUID as its id. Read it back with
    /// [`TaskRequest::id`] before scheduling.
    pub fn with_generated_id<O>(name: impl Into<String>, operation: O) -> Self
    where
        O: TaskOperation<T>,
    {
        Self::new(uuid::Uuid::new_v4().to_string(), name, operation)
    }
}

impl<T> TaskRequest<T> {
    /// Set the queue priority.
    #[must_use]
    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Set the per-attempt execution timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set how many times a failed attempt is retried.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Task identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Final (or pending) outcome published to waiters.
#[derive(Debug, Clone)]
enum Outcome<T> {
    Pending,
    Completed(T),
    Failed(String),
    Cancelled,
}

struct TaskEntry<T> {
    signal: watch::Sender<Outcome<T>>,
    stats: TaskStats,
    finished_at: Option<Instant>,
}

impl<T> TaskEntry<T> {
    fn finish(&mut self, status: TaskStatus, outcome: Outcome<T>) {
        self.stats.status = status;
        self.finished_at = Some(Instant::now());
        self.signal.send_replace(outcome);
    }
}

struct SchedulerState<T> {
    queue: TaskQueue<T>,
    tasks: HashMap<TaskId, TaskEntry<T>>,
    next_sequence: u64,
    active: usize,
    completed: u64,
    failed: u64,
    cancelled: u64,
    retried: u64,
}

impl<T> SchedulerState<T> {
    fn entry_mut(&mut self, task_id: &str) -> Result<&mut TaskEntry<T>, SchedulerError> {
        self.tasks
            .get_mut(task_id)
            .ok_or_else(|| SchedulerError::Internal(format!("no entry for running task {task_id}")))
    }

    fn evict_finished(&mut self, older_than: Option<Instant>) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|_, entry| match (entry.finished_at, older_than) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(finished), Some(cutoff)) => finished > cutoff,
        });
        before - self.tasks.len()
    }
}

struct SchedulerInner<T> {
    config: SchedulerConfig,
    state: Mutex<SchedulerState<T>>,
    work_available: Notify,
}

struct Lifecycle {
    state: LifecycleState,
    cancel: CancellationToken,
    live_workers: usize,
}

/// Lifecycle shared with the workers so the last one out can finish a stop
/// even when nobody is awaiting `stop()` any more.
struct LifecycleCell {
    state: Mutex<Lifecycle>,
    workers_exited: Notify,
}

impl LifecycleCell {
    fn current(&self) -> LifecycleState {
        self.state.lock().state
    }
}

/// Held by each worker task; dropping it (on return, panic or runtime
/// shutdown) retires the worker.
struct WorkerGuard {
    worker_id: usize,
    lifecycle: Arc<LifecycleCell>,
}

impl Drop for WorkerGuard {
    fn drop(&mut self) {
        if std::thread::panicking() {
            warn!(worker_id = self.worker_id, "worker terminated abnormally");
        }
        let mut lifecycle = self.lifecycle.state.lock();
        lifecycle.live_workers = lifecycle.live_workers.saturating_sub(1);
        if lifecycle.live_workers == 0 && lifecycle.state == LifecycleState::Stopping {
            lifecycle.state = LifecycleState::Stopped;
            drop(lifecycle);
            self.lifecycle.workers_exited.notify_waiters();
            info!("task scheduler stopped");
        }
    }
}

/// What a worker does after handling one task.
enum Flow {
    Continue,
    Stop,
}

/// Priority-ordered task queue serviced by a fixed pool of workers.
///
/// `T` is the result type shared by every task on this scheduler.
pub struct TaskScheduler<T> {
    inner: Arc<SchedulerInner<T>>,
    lifecycle: Arc<LifecycleCell>,
}

impl<T> TaskScheduler<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a scheduler. Workers are not running until [`TaskScheduler::start`].
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidConfig`] if the configuration is invalid.
    pub fn new(config: SchedulerConfig) -> Result<Self, SchedulerError> {
        config.validate().map_err(SchedulerError::InvalidConfig)?;

        Ok(Self {
            inner: Arc::new(SchedulerInner {
                config,
                state: Mutex::new(SchedulerState {
                    queue: TaskQueue::new(),
                    tasks: HashMap::new(),
                    next_sequence: 0,
                    active: 0,
                    completed: 0,
                    failed: 0,
                    cancelled: 0,
                    retried: 0,
                }),
                work_available: Notify::new(),
            }),
            lifecycle: Arc::new(LifecycleCell {
                state: Mutex::new(Lifecycle {
                    state: LifecycleState::New,
                    cancel: CancellationToken::new(),
                    live_workers: 0,
                }),
                workers_exited: Notify::new(),
            }),
        })
    }

    /// Scheduler configuration.
    #[must_use]
    pub fn config(&self) -> &SchedulerConfig {
        &self.inner.config
    }

    /// Spawn the worker loops on the current tokio runtime.
    ///
    /// Idempotent: calling it while running does nothing. A stopped
    /// scheduler can be started again and resumes its queue.
    ///
    /// # Errors
    ///
    /// - [`SchedulerError::Stopping`] while workers from a previous `stop()` are still exiting
    /// - [`SchedulerError::Internal`] when called outside a tokio runtime
    pub fn start(&self) -> Result<(), SchedulerError> {
        let mut lifecycle = self.lifecycle.state.lock();
        match lifecycle.state {
            LifecycleState::Running => {
                debug!("start ignored, scheduler already running");
                return Ok(());
            }
            LifecycleState::Stopping => return Err(SchedulerError::Stopping),
            LifecycleState::New | LifecycleState::Stopped => {}
        }

        let handle = tokio::runtime::Handle::try_current()
            .map_err(|e| SchedulerError::Internal(format!("no tokio runtime: {e}")))?;

        let cancel = CancellationToken::new();
        let worker_count = self.inner.config.worker_count;
        lifecycle.live_workers = worker_count;
        lifecycle.cancel = cancel.clone();
        lifecycle.state = LifecycleState::Running;
        // A worker guard may drop synchronously inside spawn.
        drop(lifecycle);

        for worker_id in 0..worker_count {
            let guard = WorkerGuard {
                worker_id,
                lifecycle: Arc::clone(&self.lifecycle),
            };
            handle.spawn(worker_loop(
                worker_id,
                Arc::clone(&self.inner),
                cancel.clone(),
                guard,
            ));
        }

        info!(worker_count, "task scheduler started");
        Ok(())
    }

    /// Cancel every worker at its next suspension point and wait for all of
    /// them to exit.
    ///
    /// Idempotent, and callable concurrently: every caller returns once the
    /// scheduler is `Stopped`. Dropping the returned future does not abort
    /// the stop; the last worker to exit completes it. Tasks interrupted
    /// mid-execution finish as cancelled; tasks interrupted during a retry
    /// backoff go back to the queue; queued tasks stay queued for a later
    /// `start()`.
    pub async fn stop(&self) {
        {
            let mut lifecycle = self.lifecycle.state.lock();
            match lifecycle.state {
                LifecycleState::Running => {
                    info!(worker_count = lifecycle.live_workers, "stopping task scheduler");
                    lifecycle.cancel.cancel();
                    if lifecycle.live_workers == 0 {
                        lifecycle.state = LifecycleState::Stopped;
                        info!("task scheduler stopped");
                        return;
                    }
                    lifecycle.state = LifecycleState::Stopping;
                }
                LifecycleState::Stopping => {}
                LifecycleState::New | LifecycleState::Stopped => return,
            }
        }

        loop {
            let exited = self.lifecycle.workers_exited.notified();
            if self.lifecycle.current() != LifecycleState::Stopping {
                return;
            }
            exited.await;
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn lifecycle_state(&self) -> LifecycleState {
        self.lifecycle.current()
    }

    /// Enqueue a task and create its completion signal.
    ///
    /// # Errors
    ///
    /// - [`SchedulerError::DuplicateTask`] if a task with the same id is still pending
    /// - [`SchedulerError::QueueFull`] if `max_queue_depth` is configured and reached
    pub fn schedule(&self, request: TaskRequest<T>) -> Result<(), SchedulerError> {
        let config = &self.inner.config;
        let mut state = self.inner.state.lock();

        if let Some(ttl) = config.result_ttl {
            let evicted = state.evict_finished(Instant::now().checked_sub(ttl));
            if evicted > 0 {
                debug!(evicted, "evicted expired task outcomes");
            }
        }

        if state
            .tasks
            .get(&request.id)
            .is_some_and(|entry| entry.stats.status.is_pending())
        {
            return Err(SchedulerError::DuplicateTask(request.id));
        }

        if let Some(max_depth) = config.max_queue_depth {
            if state.queue.len() >= max_depth {
                warn!(task_id = %request.id, depth = state.queue.len(), "task rejected: queue full");
                return Err(SchedulerError::QueueFull(format!(
                    "max queue depth {max_depth} reached"
                )));
            }
        }

        let sequence = state.next_sequence;
        state.next_sequence += 1;

        let task = QueuedTask {
            id: request.id,
            name: request.name,
            operation: request.operation,
            priority: request.priority,
            submitted_at_ms: now_ms(),
            sequence,
            timeout: request.timeout.unwrap_or(config.default_timeout),
            retry_count: 0,
            max_retries: request.max_retries.unwrap_or(config.default_max_retries),
        };

        let (signal, _) = watch::channel(Outcome::Pending);
        let stats = TaskStats {
            task_id: task.id.clone(),
            name: task.name.clone(),
            priority: task.priority,
            status: TaskStatus::Queued,
            attempts: 0,
            successes: 0,
            failures: 0,
            total_execution_time: Duration::ZERO,
            errors: Vec::new(),
            submitted_at_ms: task.submitted_at_ms,
        };

        debug!(
            task_id = %task.id,
            name = %task.name,
            priority = %task.priority,
            sequence,
            "task scheduled"
        );

        state.tasks.insert(
            task.id.clone(),
            TaskEntry {
                signal,
                stats,
                finished_at: None,
            },
        );
        state.queue.push(task);
        drop(state);

        self.inner.work_available.notify_one();
        Ok(())
    }

    /// Wait until the task reaches a final outcome.
    ///
    /// Any number of callers may wait on the same id; all observe the same
    /// outcome, which stays readable until the task is cleared.
    ///
    /// # Errors
    ///
    /// - [`SchedulerError::TaskNotFound`] for unknown (or cleared) ids
    /// - [`SchedulerError::WaitTimeout`] if `timeout` elapses first; the task may still run
    /// - [`SchedulerError::ExecutionFailed`] if the task exhausted its retries
    /// - [`SchedulerError::Cancelled`] if `stop()` interrupted it
    pub async fn wait_for_task(
        &self,
        task_id: &str,
        timeout: Option<Duration>,
    ) -> Result<T, SchedulerError> {
        let mut signal = {
            let state = self.inner.state.lock();
            state
                .tasks
                .get(task_id)
                .map(|entry| entry.signal.subscribe())
                .ok_or_else(|| SchedulerError::TaskNotFound(task_id.to_string()))?
        };

        let settled = async {
            signal
                .wait_for(|outcome| !matches!(outcome, Outcome::Pending))
                .await
                .map(|outcome| (*outcome).clone())
        };

        let outcome = match timeout {
            Some(limit) => tokio::time::timeout(limit, settled).await.map_err(|_| {
                SchedulerError::WaitTimeout {
                    task_id: task_id.to_string(),
                    waited: limit,
                }
            })?,
            None => settled.await,
        }
        .map_err(|_| SchedulerError::TaskNotFound(task_id.to_string()))?;

        match outcome {
            Outcome::Completed(value) => Ok(value),
            Outcome::Failed(error) => Err(SchedulerError::ExecutionFailed {
                task_id: task_id.to_string(),
                error,
            }),
            Outcome::Cancelled => Err(SchedulerError::Cancelled(task_id.to_string())),
            Outcome::Pending => Err(SchedulerError::Internal(format!(
                "task {task_id} settled without an outcome"
            ))),
        }
    }

    /// Scheduler-wide counters.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn get_stats(&self) -> SchedulerStats {
        let lifecycle_state = self.lifecycle_state();
        let state = self.inner.state.lock();
        let finished = state.completed + state.failed;
        let success_rate = if finished == 0 {
            0.0
        } else {
            state.completed as f64 / finished as f64
        };

        SchedulerStats {
            running: lifecycle_state == LifecycleState::Running,
            state: lifecycle_state,
            worker_count: self.inner.config.worker_count,
            queue_depth: state.queue.len(),
            active_tasks: state.active,
            completed_tasks: state.completed,
            failed_tasks: state.failed,
            cancelled_tasks: state.cancelled,
            retried_attempts: state.retried,
            success_rate,
        }
    }

    /// Counters for one task, if it is still tracked.
    #[must_use]
    pub fn get_task_stats(&self, task_id: &str) -> Option<TaskStats> {
        self.inner
            .state
            .lock()
            .tasks
            .get(task_id)
            .map(|entry| entry.stats.clone())
    }

    /// Forget a finished task's outcome and stats. Pending tasks are kept.
    ///
    /// Returns `true` if an entry was removed.
    pub fn clear_task(&self, task_id: &str) -> bool {
        let mut state = self.inner.state.lock();
        match state.tasks.get(task_id) {
            Some(entry) if !entry.stats.status.is_pending() => {
                state.tasks.remove(task_id);
                true
            }
            _ => false,
        }
    }

    /// Forget every finished task. Returns how many were removed.
    pub fn clear_completed(&self) -> usize {
        self.inner.state.lock().evict_finished(None)
    }

    /// Forget finished tasks older than the configured `result_ttl`.
    /// Returns how many were removed (always 0 without a TTL).
    pub fn evict_expired(&self) -> usize {
        let Some(ttl) = self.inner.config.result_ttl else {
            return 0;
        };
        let Some(cutoff) = Instant::now().checked_sub(ttl) else {
            return 0;
        };
        self.inner.state.lock().evict_finished(Some(cutoff))
    }
}

impl<T> Drop for TaskScheduler<T> {
    fn drop(&mut self) {
        // Signal workers but don't join them here; explicit stop() is required
        // for a graceful wait.
        let lifecycle = self.lifecycle.state.lock();
        if lifecycle.state == LifecycleState::Running {
            lifecycle.cancel.cancel();
            debug!("TaskScheduler dropped without explicit stop - workers cancelled");
        }
    }
}

impl<T> SchedulerInner<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Pop the next task and mark it running.
    fn next_task(&self) -> Option<QueuedTask<T>> {
        let mut state = self.state.lock();
        let task = state.queue.pop()?;
        state.active += 1;
        if let Some(entry) = state.tasks.get_mut(&task.id) {
            entry.stats.status = TaskStatus::Running;
        }
        Some(task)
    }

    /// Put a task back in the queue with its original sequence number.
    fn requeue(&self, task: QueuedTask<T>) -> Result<(), SchedulerError> {
        {
            let mut state = self.state.lock();
            state.active = state.active.saturating_sub(1);
            state.entry_mut(&task.id)?.stats.status = TaskStatus::Queued;
            state.queue.push(task);
        }
        self.work_available.notify_one();
        Ok(())
    }

    fn record_success(&self, task: &QueuedTask<T>, value: T, elapsed: Duration) -> Result<(), SchedulerError> {
        let mut state = self.state.lock();
        state.active = state.active.saturating_sub(1);
        state.completed += 1;
        let entry = state.entry_mut(&task.id)?;
        entry.stats.attempts += 1;
        entry.stats.successes += 1;
        entry.stats.total_execution_time += elapsed;
        entry.finish(TaskStatus::Completed, Outcome::Completed(value));
        Ok(())
    }

    fn record_retry(&self, task: &QueuedTask<T>, error: &str, elapsed: Duration) -> Result<(), SchedulerError> {
        let mut state = self.state.lock();
        state.retried += 1;
        let entry = state.entry_mut(&task.id)?;
        entry.stats.attempts += 1;
        entry.stats.failures += 1;
        entry.stats.total_execution_time += elapsed;
        entry.stats.errors.push(error.to_string());
        entry.stats.status = TaskStatus::Retrying;
        Ok(())
    }

    fn record_failure(&self, task: &QueuedTask<T>, error: String, elapsed: Duration) -> Result<(), SchedulerError> {
        let mut state = self.state.lock();
        state.active = state.active.saturating_sub(1);
        state.failed += 1;
        let entry = state.entry_mut(&task.id)?;
        entry.stats.attempts += 1;
        entry.stats.failures += 1;
        entry.stats.total_execution_time += elapsed;
        entry.stats.errors.push(error.clone());
        entry.finish(TaskStatus::Failed, Outcome::Failed(error));
        Ok(())
    }

    fn record_cancelled(&self, task: &QueuedTask<T>, elapsed: Duration) -> Result<(), SchedulerError> {
        let mut state = self.state.lock();
        state.active = state.active.saturating_sub(1);
        state.cancelled += 1;
        let entry = state.entry_mut(&task.id)?;
        entry.stats.attempts += 1;
        entry.stats.total_execution_time += elapsed;
        entry.finish(TaskStatus::Cancelled, Outcome::Cancelled);
        Ok(())
    }

    /// Execute one attempt of `task` and route its outcome.
    async fn run_task(
        &self,
        worker_id: usize,
        mut task: QueuedTask<T>,
        cancel: &CancellationToken,
    ) -> Result<Flow, SchedulerError> {
        if cancel.is_cancelled() {
            // Never started: leave it for the next start().
            self.requeue(task)?;
            return Ok(Flow::Stop);
        }

        let attempt = task.retry_count + 1;
        debug!(worker_id, task_id = %task.id, name = %task.name, attempt, "executing task");

        let operation = Arc::clone(&task.operation);
        let execution =
            AssertUnwindSafe(tokio::time::timeout(task.timeout, operation.execute())).catch_unwind();
        let started = Instant::now();

        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => None,
            result = execution => Some(result),
        };
        let elapsed = started.elapsed();

        let Some(result) = result else {
            warn!(worker_id, task_id = %task.id, "task interrupted by scheduler stop");
            self.record_cancelled(&task, elapsed)?;
            return Ok(Flow::Stop);
        };

        let failure = match result {
            Ok(Ok(Ok(value))) => {
                self.record_success(&task, value, elapsed)?;
                info!(worker_id, task_id = %task.id, attempt, ?elapsed, "task completed");
                return Ok(Flow::Continue);
            }
            Ok(Ok(Err(e))) => format!("{e:#}"),
            Ok(Err(_)) => format!("task timed out after {:?}", task.timeout),
            Err(panic) => format!("task panicked: {}", panic_message(panic.as_ref())),
        };

        task.retry_count += 1;
        if task.retry_count > task.max_retries {
            error!(
                worker_id,
                task_id = %task.id,
                attempts = attempt,
                error = %failure,
                "task failed after exhausting retries"
            );
            self.record_failure(&task, failure, elapsed)?;
            return Ok(Flow::Continue);
        }

        self.record_retry(&task, &failure, elapsed)?;
        let delay = self.config.backoff.next_delay(task.retry_count - 1);
        warn!(
            worker_id,
            task_id = %task.id,
            attempt,
            max_retries = task.max_retries,
            ?delay,
            error = %failure,
            "task attempt failed, retrying"
        );

        let interrupted = tokio::select! {
            biased;
            () = cancel.cancelled() => true,
            () = tokio::time::sleep(delay) => false,
        };
        self.requeue(task)?;

        Ok(if interrupted { Flow::Stop } else { Flow::Continue })
    }
}

async fn worker_loop<T>(
    worker_id: usize,
    inner: Arc<SchedulerInner<T>>,
    cancel: CancellationToken,
    _guard: WorkerGuard,
) where
    T: Clone + Send + Sync + 'static,
{
    debug!(worker_id, "worker started");

    while !cancel.is_cancelled() {
        let Some(task) = inner.next_task() else {
            tokio::select! {
                () = cancel.cancelled() => break,
                () = inner.work_available.notified() => {}
                () = tokio::time::sleep(inner.config.idle_poll_interval) => {}
            }
            continue;
        };

        match inner.run_task(worker_id, task, &cancel).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Stop) => break,
            Err(e) => {
                error!(worker_id, error = %e, "worker loop error, pausing");
                tokio::select! {
                    () = cancel.cancelled() => break,
                    () = tokio::time::sleep(inner.config.error_pause) => {}
                }
            }
        }
    }

    debug!(worker_id, "worker exiting");
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
