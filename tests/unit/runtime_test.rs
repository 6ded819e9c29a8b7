//! Tests for the snapshot and health API

use std::time::Duration;

use prometheus_dispatch::config::{CircuitBreakerConfig, SchedulerConfig};
use prometheus_dispatch::core::{LifecycleState, ResourcePool, TaskScheduler};
use prometheus_dispatch::resilience::ErrorRecoveryManager;
use prometheus_dispatch::runtime::{health, snapshot};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_health_tracks_scheduler_and_breakers() {
    let scheduler = TaskScheduler::<u8>::new(SchedulerConfig::new().with_worker_count(1)).unwrap();
    let manager = ErrorRecoveryManager::new();

    let report = health(&scheduler, &manager);
    assert!(!report.ok);
    assert_eq!(report.scheduler_state, LifecycleState::New);

    scheduler.start().unwrap();
    assert!(health(&scheduler, &manager).ok);

    let breaker = manager.get_circuit_breaker("llm", CircuitBreakerConfig::new().with_failure_threshold(1));
    breaker.record_failure();
    let report = health(&scheduler, &manager);
    assert!(!report.ok);
    assert_eq!(report.open_circuits, vec!["llm".to_string()]);

    scheduler.stop().await;
}

#[tokio::test]
async fn test_snapshot_serializes() {
    let scheduler = TaskScheduler::<u8>::new(SchedulerConfig::new().with_worker_count(2)).unwrap();
    let manager = ErrorRecoveryManager::new();
    manager.get_circuit_breaker("search", CircuitBreakerConfig::default());
    let pool = ResourcePool::new(2, Duration::from_millis(10));
    pool.initialize(|| Ok::<_, std::io::Error>("conn")).unwrap();

    let snap = snapshot(&scheduler, &manager, Some(&pool));
    assert_eq!(snap.scheduler.worker_count, 2);
    assert_eq!(snap.circuit_breakers.len(), 1);
    assert_eq!(snap.resource_pool.unwrap().available, 2);

    let json = serde_json::to_value(&snap).unwrap();
    assert_eq!(json["scheduler"]["state"], "new");
    assert_eq!(json["circuit_breakers"][0]["state"], "closed");

    let without_pool = snapshot::<u8, ()>(&scheduler, &manager, None);
    assert!(without_pool.resource_pool.is_none());
}
