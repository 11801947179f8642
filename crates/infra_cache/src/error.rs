//! Cache infrastructure errors

use std::time::Duration;

use core_kernel::PortError;
use thiserror::Error;

/// Errors raised by the Redis cache adapter
#[derive(Debug, Error)]
pub enum CacheError {
    /// The connection URL could not be parsed
    #[error("Invalid Redis URL: {0}")]
    InvalidUrl(#[source] redis::RedisError),

    /// Could not reach the server or the connection dropped
    #[error("Redis connection failed: {0}")]
    ConnectionFailed(#[source] redis::RedisError),

    /// The server answered with an error
    #[error("Redis command failed: {0}")]
    CommandFailed(#[source] redis::RedisError),

    /// The command did not complete in time
    #[error("Redis {operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_connection_refusal() || err.is_connection_dropped() || err.is_io_error() {
            CacheError::ConnectionFailed(err)
        } else {
            CacheError::CommandFailed(err)
        }
    }
}

impl From<CacheError> for PortError {
    fn from(err: CacheError) -> Self {
        match err {
            CacheError::Timeout { operation, after } => PortError::Timeout {
                operation: format!("redis {}", operation),
                duration_ms: after.as_millis() as u64,
            },
            CacheError::ConnectionFailed(e) | CacheError::InvalidUrl(e) => {
                PortError::connection_with_source("Redis unavailable", e)
            }
            CacheError::CommandFailed(e) => PortError::Internal {
                message: "Redis command failed".to_string(),
                source: Some(Box::new(e)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_is_transient() {
        let err: PortError = CacheError::Timeout {
            operation: "LRANGE",
            after: Duration::from_millis(5),
        }
        .into();
        assert!(matches!(err, PortError::Timeout { duration_ms: 5, .. }));
        assert!(err.is_transient());
    }

    #[test]
    fn test_io_error_maps_to_connection() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = CacheError::from(redis::RedisError::from(io));
        assert!(matches!(err, CacheError::ConnectionFailed(_)));

        let port: PortError = err.into();
        assert!(matches!(port, PortError::Connection { .. }));
    }
}
