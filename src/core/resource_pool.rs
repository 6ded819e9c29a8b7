//! Bounded pool of interchangeable resources.
//!
//! The pool is filled once by [`ResourcePool::initialize`] and then lends
//! handles out with [`ResourcePool::acquire`]. It counts handles in and out
//! but never inspects them: releasing a handle that did not come from this
//! pool is accepted, and a caller that never releases leaks capacity.
//! Prefer [`ResourcePool::acquire_scoped`], whose guard returns the handle
//! on every exit path.

use std::collections::VecDeque;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use super::PoolError;
use crate::config::ResourcePoolConfig;

/// Snapshot of pool counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePoolStats {
    /// Configured capacity.
    pub max_size: usize,
    /// Resources built by `initialize`.
    pub created: usize,
    /// Resources currently lent out.
    pub acquired: usize,
    /// Resources sitting in the pool.
    pub available: usize,
}

/// Bounded FIFO pool of opaque resources with waiting acquisition.
pub struct ResourcePool<R> {
    max_size: usize,
    acquire_timeout: Duration,
    resources: Mutex<VecDeque<R>>,
    /// One permit per resource in `resources`; FIFO among waiters.
    permits: Semaphore,
    created: AtomicUsize,
    in_use: AtomicUsize,
}

impl<R> ResourcePool<R>
where
    R: Send,
{
    /// Create an empty pool. Call [`ResourcePool::initialize`] before use.
    #[must_use]
    pub fn new(max_size: usize, acquire_timeout: Duration) -> Self {
        Self {
            max_size,
            acquire_timeout,
            resources: Mutex::new(VecDeque::with_capacity(max_size)),
            permits: Semaphore::new(0),
            created: AtomicUsize::new(0),
            in_use: AtomicUsize::new(0),
        }
    }

    /// Create an empty pool from configuration.
    #[must_use]
    pub fn from_config(config: &ResourcePoolConfig) -> Self {
        Self::new(config.max_size, config.acquire_timeout)
    }

    /// Build exactly `max_size` resources with `factory`; the pool starts full.
    ///
    /// Nothing is added unless every call to `factory` succeeds.
    ///
    /// # Errors
    ///
    /// - [`PoolError::InvalidConfig`] if the pool was created with `max_size == 0`
    /// - [`PoolError::AlreadyInitialized`] on a second call
    /// - [`PoolError::Factory`] if the factory fails
    pub fn initialize<F, E>(&self, mut factory: F) -> Result<(), PoolError>
    where
        F: FnMut() -> Result<R, E>,
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        // `created > 0` marks the pool initialized, so zero capacity never could be.
        if self.max_size == 0 {
            return Err(PoolError::InvalidConfig(
                "max_size must be greater than 0".to_string(),
            ));
        }
        if self.created.load(Ordering::Acquire) > 0 {
            return Err(PoolError::AlreadyInitialized);
        }

        let mut built = Vec::with_capacity(self.max_size);
        for index in 0..self.max_size {
            let resource = factory().map_err(|e| PoolError::Factory {
                index,
                source: e.into(),
            })?;
            built.push(resource);
        }

        {
            let mut resources = self.resources.lock();
            if self.created.load(Ordering::Acquire) > 0 {
                return Err(PoolError::AlreadyInitialized);
            }
            resources.extend(built);
            self.created.store(self.max_size, Ordering::Release);
        }
        self.permits.add_permits(self.max_size);

        info!(max_size = self.max_size, "resource pool initialized");
        Ok(())
    }

    /// Take a resource, waiting up to the acquire timeout for one to be released.
    ///
    /// The caller must hand it back with [`ResourcePool::release`].
    ///
    /// # Errors
    ///
    /// - [`PoolError::NotInitialized`] before `initialize`
    /// - [`PoolError::AcquireTimeout`] if nothing was released in time
    pub async fn acquire(&self) -> Result<R, PoolError> {
        if self.created.load(Ordering::Acquire) == 0 {
            return Err(PoolError::NotInitialized);
        }

        let permit = tokio::time::timeout(self.acquire_timeout, self.permits.acquire())
            .await
            .map_err(|_| {
                warn!(timeout = ?self.acquire_timeout, "resource acquire timed out");
                PoolError::AcquireTimeout(self.acquire_timeout)
            })?
            .map_err(|_| PoolError::NotInitialized)?;
        // The resource leaves with the caller; its permit comes back on release.
        permit.forget();

        let resource = self.resources.lock().pop_front().ok_or_else(|| {
            PoolError::AcquireTimeout(self.acquire_timeout)
        })?;
        let in_use = self.in_use.fetch_add(1, Ordering::AcqRel) + 1;
        debug!(in_use, "resource acquired");
        Ok(resource)
    }

    /// Return a resource to the pool. The handle's origin is not checked.
    pub fn release(&self, resource: R) {
        self.resources.lock().push_back(resource);
        let _ = self
            .in_use
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| Some(n.saturating_sub(1)));
        self.permits.add_permits(1);
        debug!("resource released");
    }

    /// Acquire a resource wrapped in a guard that releases it when dropped.
    ///
    /// # Errors
    ///
    /// Same as [`ResourcePool::acquire`].
    pub async fn acquire_scoped(&self) -> Result<PooledResource<'_, R>, PoolError> {
        let resource = self.acquire().await?;
        Ok(PooledResource {
            pool: self,
            resource: Some(resource),
        })
    }

    /// Current pool counters.
    #[must_use]
    pub fn get_stats(&self) -> ResourcePoolStats {
        ResourcePoolStats {
            max_size: self.max_size,
            created: self.created.load(Ordering::Acquire),
            acquired: self.in_use.load(Ordering::Acquire),
            available: self.resources.lock().len(),
        }
    }
}

/// Scoped loan of a pool resource; released back on drop.
pub struct PooledResource<'a, R>
where
    R: Send,
{
    pool: &'a ResourcePool<R>,
    resource: Option<R>,
}

impl<R> PooledResource<'_, R>
where
    R: Send,
{
    /// Take the resource out of the guard. The caller becomes responsible for
    /// releasing it.
    #[must_use]
    pub fn detach(mut self) -> R {
        // `resource` is only ever None after detach/drop.
        self.resource.take().unwrap_or_else(|| unreachable!("pooled resource already taken"))
    }
}

impl<R> Deref for PooledResource<'_, R>
where
    R: Send,
{
    type Target = R;

    fn deref(&self) -> &R {
        self.resource.as_ref().unwrap_or_else(|| unreachable!("pooled resource already taken"))
    }
}

impl<R> DerefMut for PooledResource<'_, R>
where
    R: Send,
{
    fn deref_mut(&mut self) -> &mut R {
        self.resource.as_mut().unwrap_or_else(|| unreachable!("pooled resource already taken"))
    }
}

impl<R> Drop for PooledResource<'_, R>
where
    R: Send,
{
    fn drop(&mut self) {
        if let Some(resource) = self.resource.take() {
            self.pool.release(resource);
        }
    }
}
