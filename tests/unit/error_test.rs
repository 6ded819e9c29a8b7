//! Tests for error types

use std::time::Duration;

use prometheus_dispatch::core::{PoolError, SchedulerError};
use prometheus_dispatch::resilience::ResilienceError;

#[test]
fn test_queue_full_error() {
    let err = SchedulerError::QueueFull("max queue depth 8 reached".to_string());
    assert_eq!(format!("{}", err), "queue full: max queue depth 8 reached");
}

#[test]
fn test_execution_failed_error() {
    let err = SchedulerError::ExecutionFailed {
        task_id: "tool-42".to_string(),
        error: "http 502".to_string(),
    };
    assert_eq!(format!("{}", err), "task tool-42 failed: http 502");
}

#[test]
fn test_duplicate_and_not_found_errors() {
    assert_eq!(
        format!("{}", SchedulerError::DuplicateTask("a".into())),
        "task a is already scheduled"
    );
    assert_eq!(
        format!("{}", SchedulerError::TaskNotFound("b".into())),
        "task not found: b"
    );
    assert_eq!(format!("{}", SchedulerError::Cancelled("c".into())), "task c was cancelled");
    assert_eq!(SchedulerError::Stopping.to_string(), "scheduler is still stopping");
}

#[test]
fn test_pool_factory_error_keeps_source() {
    let err = PoolError::Factory {
        index: 3,
        source: Box::new(std::io::Error::other("refused")),
    };
    assert_eq!(format!("{}", err), "resource factory failed creating resource 3");
    let source = std::error::Error::source(&err).unwrap();
    assert_eq!(source.to_string(), "refused");
}

#[test]
fn test_pool_acquire_timeout_error() {
    let err = PoolError::AcquireTimeout(Duration::from_millis(500));
    assert_eq!(format!("{}", err), "timed out after 500ms acquiring a resource");
}

#[test]
fn test_resilience_error_converts_into_anyhow() {
    let err: ResilienceError<anyhow::Error> = ResilienceError::Operation(anyhow::anyhow!("quota exceeded"));
    let wrapped: anyhow::Error = err.into();
    assert_eq!(wrapped.to_string(), "quota exceeded");
}
