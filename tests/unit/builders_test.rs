//! Tests for builder modules

use std::time::Duration;

use prometheus_dispatch::builders::{build_recovery_manager, build_resource_pool, build_scheduler};
use prometheus_dispatch::config::{
    CircuitBreakerConfig, DispatchConfig, ResilienceConfig, ResourcePoolConfig, RetryPolicyConfig,
};
use prometheus_dispatch::core::{LifecycleState, PoolError, SchedulerError};

#[test]
fn test_build_scheduler_from_config() {
    let mut cfg = DispatchConfig::default();
    cfg.scheduler.worker_count = 2;
    let scheduler = build_scheduler::<String>(&cfg).unwrap();
    assert_eq!(scheduler.config().worker_count, 2);
    assert_eq!(scheduler.lifecycle_state(), LifecycleState::New);
}

#[test]
fn test_build_scheduler_rejects_bad_resilience_entry() {
    let mut cfg = DispatchConfig::default();
    cfg.resilience.timeouts_ms.insert("search".into(), 0);
    let err = build_scheduler::<String>(&cfg).err().unwrap();
    assert!(matches!(err, SchedulerError::InvalidConfig(_)));
}

#[test]
fn test_build_resource_pool_fills_pool() {
    let cfg = ResourcePoolConfig {
        max_size: 3,
        acquire_timeout: Duration::from_millis(100),
    };
    let pool = build_resource_pool(&cfg, || Ok::<_, std::io::Error>(String::from("slot"))).unwrap();
    assert_eq!(pool.get_stats().available, 3);
}

#[test]
fn test_build_resource_pool_rejects_zero_size() {
    let cfg = ResourcePoolConfig {
        max_size: 0,
        acquire_timeout: Duration::from_millis(100),
    };
    let result = build_resource_pool(&cfg, || Ok::<_, std::io::Error>(()));
    assert!(matches!(result, Err(PoolError::InvalidConfig(_))));
}

#[test]
fn test_build_recovery_manager_preregisters() {
    let mut cfg = ResilienceConfig::default();
    cfg.circuit_breakers.insert(
        "openai".into(),
        CircuitBreakerConfig::new().with_failure_threshold(2),
    );
    cfg.retry_policies
        .insert("tools".into(), RetryPolicyConfig::new().with_max_retries(1));
    cfg.timeouts_ms.insert("search".into(), 1500);

    let manager = build_recovery_manager(&cfg).unwrap();
    assert_eq!(manager.circuit_breaker("openai").unwrap().config().failure_threshold, 2);
    assert_eq!(manager.retry_policy("tools").unwrap().max_retries(), 1);
    assert_eq!(
        manager.timeout_handler("search").unwrap().timeout(),
        Duration::from_millis(1500)
    );
    assert_eq!(manager.breaker_stats().len(), 1);
}
