//! Integration tests for ResourcePool
//!
//! Covers bounded acquisition, acquire timeouts, FIFO hand-off to waiters and
//! scoped release.

use std::sync::Arc;
use std::time::{Duration, Instant};

use prometheus_dispatch::core::{PoolError, ResourcePool};

/// Stand-in for a provider connection.
#[derive(Debug, PartialEq, Eq)]
struct Connection {
    id: usize,
}

fn connection_pool(max_size: usize, acquire_timeout: Duration) -> ResourcePool<Connection> {
    let pool = ResourcePool::new(max_size, acquire_timeout);
    let mut next_id = 0;
    pool.initialize(|| {
        next_id += 1;
        Ok::<_, std::io::Error>(Connection { id: next_id })
    })
    .unwrap();
    pool
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_third_acquire_times_out_when_pool_exhausted() {
    let pool = connection_pool(2, Duration::from_millis(50));

    let first = pool.acquire().await.unwrap();
    let second = pool.acquire().await.unwrap();
    assert_eq!(pool.get_stats().acquired, 2);
    assert_eq!(pool.get_stats().available, 0);

    let started = Instant::now();
    let err = pool.acquire().await.unwrap_err();
    assert!(matches!(err, PoolError::AcquireTimeout(t) if t == Duration::from_millis(50)));
    assert!(started.elapsed() >= Duration::from_millis(50));

    pool.release(first);
    pool.release(second);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_release_unblocks_pending_acquire() {
    let pool = Arc::new(connection_pool(2, Duration::from_secs(5)));
    let first = pool.acquire().await.unwrap();
    let _second = pool.acquire().await.unwrap();

    let pending = {
        let pool = Arc::clone(&pool);
        tokio::spawn(async move { pool.acquire().await })
    };
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert!(!pending.is_finished());

    let released_at = Instant::now();
    pool.release(first);
    let handed_over = pending.await.unwrap().unwrap();
    assert_eq!(handed_over, Connection { id: 1 });
    assert!(released_at.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn test_releasing_everything_restores_capacity() {
    let pool = connection_pool(4, Duration::from_millis(50));
    let mut held = Vec::new();
    for _ in 0..4 {
        held.push(pool.acquire().await.unwrap());
    }
    assert_eq!(pool.get_stats().available, 0);

    for connection in held {
        pool.release(connection);
    }
    let stats = pool.get_stats();
    assert_eq!(stats.available, stats.max_size);
    assert_eq!(stats.acquired, 0);
    assert_eq!(stats.created, 4);
}

#[tokio::test]
async fn test_scoped_acquire_releases_on_error_path() {
    let pool = connection_pool(1, Duration::from_millis(50));

    async fn use_connection(pool: &ResourcePool<Connection>) -> Result<usize, String> {
        let connection = pool.acquire_scoped().await.map_err(|e| e.to_string())?;
        if connection.id == 1 {
            return Err("request rejected".to_string());
        }
        Ok(connection.id)
    }

    assert!(use_connection(&pool).await.is_err());
    assert_eq!(pool.get_stats().available, 1);
    assert!(pool.acquire().await.is_ok());
}
