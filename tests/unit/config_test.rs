//! Tests for configuration validation and loading

use std::collections::HashMap;
use std::time::Duration;

use prometheus_dispatch::config::{
    BackoffConfig, CircuitBreakerConfig, DispatchConfig, ResourcePoolConfig, RetryPolicyConfig,
    SchedulerConfig,
};

#[test]
fn test_default_config_is_valid() {
    let cfg = DispatchConfig::default();
    assert!(cfg.validate().is_ok());
    assert!(cfg.scheduler.worker_count >= 1);
    assert_eq!(cfg.scheduler.default_max_retries, 3);
    assert_eq!(cfg.resource_pool.max_size, 10);
}

#[test]
fn test_scheduler_config_invalid_worker_count() {
    let invalid = SchedulerConfig::new().with_worker_count(0);
    assert!(invalid.validate().is_err());
}

#[test]
fn test_scheduler_config_invalid_queue_depth() {
    let invalid = SchedulerConfig::new().with_max_queue_depth(0);
    assert!(invalid.validate().is_err());
}

#[test]
fn test_pool_config_invalid_size() {
    let invalid = ResourcePoolConfig {
        max_size: 0,
        acquire_timeout: Duration::from_secs(1),
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_backoff_factor_below_one_rejected() {
    let invalid = BackoffConfig {
        backoff_factor: 0.5,
        ..BackoffConfig::default()
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_breaker_config_invalid_threshold() {
    let invalid = CircuitBreakerConfig::new().with_failure_threshold(0);
    assert!(invalid.validate().is_err());
}

#[test]
fn test_dispatch_config_from_json() {
    let json = r#"{
        "scheduler": {
            "worker_count": 3,
            "default_timeout_ms": 15000,
            "backoff": { "base_delay_ms": 200, "max_delay_ms": 5000 }
        },
        "resource_pool": { "max_size": 4, "acquire_timeout_ms": 2000 },
        "resilience": {
            "circuit_breakers": { "openai": { "failure_threshold": 3, "timeout_ms": 30000 } },
            "retry_policies": { "tools": { "max_retries": 2, "base_delay_ms": 100 } },
            "timeouts_ms": { "search": 8000 }
        }
    }"#;

    let cfg = DispatchConfig::from_json_str(json).unwrap();
    assert_eq!(cfg.scheduler.worker_count, 3);
    assert_eq!(cfg.scheduler.default_timeout, Duration::from_secs(15));
    assert_eq!(cfg.scheduler.backoff.base_delay, Duration::from_millis(200));
    assert!((cfg.scheduler.backoff.backoff_factor - 2.0).abs() < f64::EPSILON);
    assert_eq!(cfg.resource_pool.max_size, 4);

    let breaker = &cfg.resilience.circuit_breakers["openai"];
    assert_eq!(breaker.failure_threshold, 3);
    assert_eq!(breaker.success_threshold, 2);
    assert_eq!(breaker.timeout, Duration::from_secs(30));

    let policy = &cfg.resilience.retry_policies["tools"];
    assert_eq!(policy.max_retries, 2);
    assert_eq!(policy.backoff.base_delay, Duration::from_millis(100));
    assert_eq!(cfg.resilience.timeouts_ms["search"], 8000);
}

#[test]
fn test_dispatch_config_from_json_rejects_invalid() {
    let err = DispatchConfig::from_json_str(r#"{ "scheduler": { "worker_count": 0 } }"#)
        .unwrap_err();
    assert!(err.contains("worker_count"));

    assert!(DispatchConfig::from_json_str("not json").is_err());
}

#[test]
fn test_dispatch_config_from_lookup() {
    let vars: HashMap<&str, &str> = [
        ("DISPATCH_WORKER_COUNT", "6"),
        ("DISPATCH_BACKOFF_JITTER", "true"),
        ("DISPATCH_RESULT_TTL_MS", "60000"),
        ("DISPATCH_POOL_MAX_SIZE", " 2 "),
    ]
    .into_iter()
    .collect();

    let cfg = DispatchConfig::from_lookup(|key| vars.get(key).map(|v| (*v).to_string())).unwrap();
    assert_eq!(cfg.scheduler.worker_count, 6);
    assert!(cfg.scheduler.backoff.jitter);
    assert_eq!(cfg.scheduler.result_ttl, Some(Duration::from_secs(60)));
    assert_eq!(cfg.resource_pool.max_size, 2);
    assert_eq!(cfg.scheduler.max_queue_depth, None);
}

#[test]
fn test_dispatch_config_from_lookup_names_bad_variable() {
    let err = DispatchConfig::from_lookup(|key| {
        (key == "DISPATCH_DEFAULT_MAX_RETRIES").then(|| "many".to_string())
    })
    .unwrap_err();
    assert!(err.contains("DISPATCH_DEFAULT_MAX_RETRIES"));
}

#[test]
fn test_retry_policy_config_builders() {
    let cfg = RetryPolicyConfig::new()
        .with_max_retries(5)
        .with_base_delay(Duration::from_millis(250))
        .with_max_delay(Duration::from_secs(2))
        .with_backoff_factor(3.0)
        .with_jitter(false);
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.backoff.delay_for_attempt(1), Duration::from_millis(750));
    assert_eq!(cfg.backoff.delay_for_attempt(10), Duration::from_secs(2));
}
