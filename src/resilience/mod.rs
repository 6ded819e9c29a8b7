//! Composable resilience primitives: circuit breaker, retry with backoff,
//! deadlines, and a name-keyed registry that composes them.

pub mod circuit_breaker;
pub mod error;
pub mod manager;
pub mod retry;
pub mod timeout;

pub use circuit_breaker::{CircuitBreaker, CircuitBreakerStats, CircuitState};
pub use error::{ResilienceError, ResilienceResult};
pub use manager::{ErrorRecoveryManager, Protection, DEFAULT_PROTECTION_TIMEOUT};
pub use retry::RetryPolicy;
pub use timeout::{OnTimeout, TimeoutHandler};
