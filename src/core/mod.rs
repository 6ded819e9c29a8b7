//! Task scheduling, task operations and resource pooling.

pub mod error;
pub mod executor;
mod queue;
pub mod resource_pool;
pub mod scheduler;
pub mod stats;

pub use error::{AppResult, PoolError, SchedulerError};
pub use executor::TaskOperation;
pub use resource_pool::{PooledResource, ResourcePool, ResourcePoolStats};
pub use scheduler::{TaskRequest, TaskScheduler};
pub use stats::{LifecycleState, SchedulerStats, TaskStats, TaskStatus};
