//! Error type shared by the resilience wrappers.

use std::time::Duration;

use thiserror::Error;

/// Failure of a call made through a resilience wrapper.
///
/// `E` is the wrapped operation's own error. It is carried unchanged so the
/// caller can still inspect the root cause.
#[derive(Debug, Error)]
pub enum ResilienceError<E> {
    /// The breaker is open; the operation was not attempted.
    #[error("circuit breaker `{name}` is open")]
    CircuitOpen {
        /// Breaker that rejected the call.
        name: String,
    },
    /// The deadline elapsed before the operation finished.
    #[error("operation timed out after {timeout:?}")]
    Timeout {
        /// Deadline that was exceeded.
        timeout: Duration,
    },
    /// The operation ran and failed.
    #[error("{0}")]
    Operation(E),
}

impl<E> ResilienceError<E> {
    /// Whether the call was rejected by an open breaker.
    #[must_use]
    pub const fn is_circuit_open(&self) -> bool {
        matches!(self, Self::CircuitOpen { .. })
    }

    /// Whether the call hit its deadline.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// The operation's own error, if that is what failed.
    #[must_use]
    pub fn into_operation(self) -> Option<E> {
        match self {
            Self::Operation(e) => Some(e),
            _ => None,
        }
    }

    /// Borrow the operation's own error, if that is what failed.
    #[must_use]
    pub const fn operation(&self) -> Option<&E> {
        match self {
            Self::Operation(e) => Some(e),
            _ => None,
        }
    }
}

/// Result of a call made through a resilience wrapper.
pub type ResilienceResult<T, E> = Result<T, ResilienceError<E>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_error_is_carried_unchanged() {
        let err: ResilienceError<std::io::Error> =
            ResilienceError::Operation(std::io::Error::other("connection reset"));
        assert_eq!(err.to_string(), "connection reset");
        assert!(!err.is_timeout());
        let inner = err.into_operation().unwrap();
        assert_eq!(inner.kind(), std::io::ErrorKind::Other);
    }

    #[test]
    fn test_condition_predicates() {
        let open: ResilienceError<std::io::Error> = ResilienceError::CircuitOpen {
            name: "llm".to_string(),
        };
        assert!(open.is_circuit_open());
        assert_eq!(open.to_string(), "circuit breaker `llm` is open");

        let timeout: ResilienceError<std::io::Error> = ResilienceError::Timeout {
            timeout: Duration::from_millis(250),
        };
        assert!(timeout.is_timeout());
        assert!(timeout.operation().is_none());
    }
}
