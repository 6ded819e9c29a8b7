//! Serializable snapshots for an external monitoring collector.

use serde::{Deserialize, Serialize};

use crate::core::{LifecycleState, ResourcePool, ResourcePoolStats, SchedulerStats, TaskScheduler};
use crate::resilience::{CircuitBreakerStats, CircuitState, ErrorRecoveryManager};
use crate::util::clock::now_ms;

/// Point-in-time view of the dispatch layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchSnapshot {
    /// Capture time (ms since epoch).
    pub captured_at_ms: u128,
    /// Scheduler counters.
    pub scheduler: SchedulerStats,
    /// Every registered breaker, sorted by name.
    pub circuit_breakers: Vec<CircuitBreakerStats>,
    /// Resource pool counters, when a pool is tracked.
    pub resource_pool: Option<ResourcePoolStats>,
}

/// Health response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    /// Healthy flag: workers running and no breaker open.
    pub ok: bool,
    /// Scheduler lifecycle state.
    pub scheduler_state: LifecycleState,
    /// Names of breakers currently open.
    pub open_circuits: Vec<String>,
}

/// Capture scheduler, breaker and (optionally) pool counters together.
#[must_use]
pub fn snapshot<T, R>(
    scheduler: &TaskScheduler<T>,
    manager: &ErrorRecoveryManager,
    pool: Option<&ResourcePool<R>>,
) -> DispatchSnapshot
where
    T: Clone + Send + Sync + 'static,
    R: Send,
{
    DispatchSnapshot {
        captured_at_ms: now_ms(),
        scheduler: scheduler.get_stats(),
        circuit_breakers: manager.breaker_stats(),
        resource_pool: pool.map(ResourcePool::get_stats),
    }
}

/// Report whether the scheduler is running and which breakers are open.
#[must_use]
pub fn health<T>(scheduler: &TaskScheduler<T>, manager: &ErrorRecoveryManager) -> Health
where
    T: Clone + Send + Sync + 'static,
{
    let scheduler_state = scheduler.lifecycle_state();
    let open_circuits: Vec<String> = manager
        .breaker_stats()
        .into_iter()
        .filter(|stats| stats.state == CircuitState::Open)
        .map(|stats| stats.name)
        .collect();

    Health {
        ok: scheduler_state == LifecycleState::Running && open_circuits.is_empty(),
        scheduler_state,
        open_circuits,
    }
}
