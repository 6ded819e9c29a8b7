//! Construct the scheduler, resource pool and recovery manager from configuration.

use std::time::Duration;

use tracing::info;

use crate::config::{DispatchConfig, ResilienceConfig, ResourcePoolConfig};
use crate::core::{PoolError, ResourcePool, SchedulerError, TaskScheduler};
use crate::resilience::ErrorRecoveryManager;

/// Build an unstarted scheduler from the whole configuration.
///
/// The full configuration is validated, not just the scheduler section, so a
/// bad resilience entry is caught at startup rather than at first use.
///
/// # Errors
///
/// [`SchedulerError::InvalidConfig`] if any section fails validation.
pub fn build_scheduler<T>(config: &DispatchConfig) -> Result<TaskScheduler<T>, SchedulerError>
where
    T: Clone + Send + Sync + 'static,
{
    config
        .validate()
        .map_err(|e| SchedulerError::InvalidConfig(format!("config invalid: {e}")))?;
    TaskScheduler::new(config.scheduler.clone())
}

/// Build a resource pool and fill it with `factory`.
///
/// # Errors
///
/// - [`PoolError::InvalidConfig`] if the pool section fails validation
/// - [`PoolError::Factory`] if the factory fails
pub fn build_resource_pool<R, F, E>(
    config: &ResourcePoolConfig,
    factory: F,
) -> Result<ResourcePool<R>, PoolError>
where
    R: Send,
    F: FnMut() -> Result<R, E>,
    E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
{
    config.validate().map_err(PoolError::InvalidConfig)?;
    let pool = ResourcePool::from_config(config);
    pool.initialize(factory)?;
    Ok(pool)
}

/// Build a recovery manager with every named primitive pre-registered.
///
/// # Errors
///
/// [`SchedulerError::InvalidConfig`] if an entry fails validation.
pub fn build_recovery_manager(
    config: &ResilienceConfig,
) -> Result<ErrorRecoveryManager, SchedulerError> {
    config
        .validate()
        .map_err(|e| SchedulerError::InvalidConfig(format!("resilience config invalid: {e}")))?;

    let manager = ErrorRecoveryManager::new();
    for (name, breaker) in &config.circuit_breakers {
        manager.register_circuit_breaker(name, breaker.clone());
    }
    for (name, policy) in &config.retry_policies {
        manager.register_retry_policy(name, policy.clone());
    }
    for (name, timeout_ms) in &config.timeouts_ms {
        manager.register_timeout_handler(name, Duration::from_millis(*timeout_ms));
    }

    info!(
        circuit_breakers = config.circuit_breakers.len(),
        retry_policies = config.retry_policies.len(),
        timeouts = config.timeouts_ms.len(),
        "recovery manager built"
    );
    Ok(manager)
}
