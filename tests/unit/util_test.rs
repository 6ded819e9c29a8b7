//! Tests for utility functions

use std::time::Duration;

use prometheus_dispatch::util::{now_ms, Clock, MockClock, TaskId, TaskPriority};

#[test]
fn test_priority_rank_ordering() {
    let ranks: Vec<u8> = TaskPriority::ALL.iter().map(|p| p.rank()).collect();
    assert_eq!(ranks, vec![0, 1, 2, 3, 4]);
    assert!(TaskPriority::Critical.rank() < TaskPriority::Background.rank());
}

#[test]
fn test_priority_default_and_serde() {
    assert_eq!(TaskPriority::default(), TaskPriority::Normal);
    assert_eq!(serde_json::to_string(&TaskPriority::High).unwrap(), "\"high\"");
    let parsed: TaskPriority = serde_json::from_str("\"background\"").unwrap();
    assert_eq!(parsed, TaskPriority::Background);
}

#[test]
fn test_mock_clock_advances() {
    let clock = MockClock::new();
    let start = clock.now();
    clock.advance(Duration::from_secs(2));
    assert_eq!(clock.now() - start, Duration::from_secs(2));
    assert_eq!(clock.elapsed(), Duration::from_secs(2));
}

#[test]
fn test_task_id() {
    let id: TaskId = "subagent-7".to_string();
    assert_eq!(id, "subagent-7");
    assert!(now_ms() > 0);
}

#[test]
fn test_tracing_init_is_repeatable() {
    prometheus_dispatch::util::init_tracing();
    prometheus_dispatch::util::init_tracing_with_default("debug");
    tracing::info!(target: "dispatch_test", "subscriber installed");
}
