//! In-memory priority queue for scheduled tasks.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;
use std::time::Duration;

use crate::core::TaskOperation;
use crate::util::serde::{TaskId, TaskPriority};

/// A task waiting in (or taken from) the scheduler queue.
pub(crate) struct QueuedTask<T> {
    pub id: TaskId,
    pub name: String,
    pub operation: Arc<dyn TaskOperation<T>>,
    pub priority: TaskPriority,
    /// Submission time in milliseconds since epoch.
    pub submitted_at_ms: u128,
    /// Submission order; kept across retries so a retried task keeps its place.
    pub sequence: u64,
    pub timeout: Duration,
    pub retry_count: u32,
    pub max_retries: u32,
}

impl<T> QueuedTask<T> {
    fn key(&self) -> (u8, u64) {
        (self.priority.rank(), self.sequence)
    }
}

/// Heap entry ordering tasks so the smallest `(rank, sequence)` pops first.
struct HeapEntry<T> {
    task: QueuedTask<T>,
}

impl<T> PartialEq for HeapEntry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.task.key() == other.task.key()
    }
}

impl<T> Eq for HeapEntry<T> {}

impl<T> PartialOrd for HeapEntry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for HeapEntry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap: reverse so the lowest key is on top.
        other.task.key().cmp(&self.task.key())
    }
}

/// Priority queue keyed by `(priority rank, submission sequence)`.
pub(crate) struct TaskQueue<T> {
    tasks: BinaryHeap<HeapEntry<T>>,
}

impl<T> TaskQueue<T> {
    pub fn new() -> Self {
        Self {
            tasks: BinaryHeap::new(),
        }
    }

    pub fn push(&mut self, task: QueuedTask<T>) {
        self.tasks.push(HeapEntry { task });
    }

    pub fn pop(&mut self) -> Option<QueuedTask<T>> {
        self.tasks.pop().map(|entry| entry.task)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }
}
