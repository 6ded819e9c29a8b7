//! Task operation abstraction.

use std::future::Future;

use async_trait::async_trait;

use super::AppResult;

/// A unit of schedulable work.
///
/// The scheduler calls [`TaskOperation::execute`] once per attempt, so an
/// operation must be re-runnable: everything it needs is captured when the
/// task is scheduled, keeping argument types checked at that point.
///
/// Any `Fn() -> impl Future<Output = AppResult<T>>` closure is an operation.
/// Typed command objects can implement the trait directly:
///
/// ```rust,ignore
/// use async_trait::async_trait;
/// use prometheus_dispatch::core::{AppResult, TaskOperation};
///
/// struct FetchCompletion {
///     provider: String,
///     prompt: String,
/// }
///
/// #[async_trait]
/// impl TaskOperation<String> for FetchCompletion {
///     async fn execute(&self) -> AppResult<String> {
///         Ok(format!("{} answered: {}", self.provider, self.prompt))
///     }
/// }
/// ```
#[async_trait]
pub trait TaskOperation<T>: Send + Sync + 'static {
    /// Run one attempt of the operation.
    async fn execute(&self) -> AppResult<T>;
}

#[async_trait]
impl<T, F, Fut> TaskOperation<T> for F
where
    T: Send + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = AppResult<T>> + Send + 'static,
{
    async fn execute(&self) -> AppResult<T> {
        (self)().await
    }
}
