//! Execution layer error types.

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

/// Classification of an upstream failure.
///
/// Assigned where the failure is wrapped so that consumers can switch on
/// the kind instead of inspecting concrete error types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Requested entity does not exist
    NotFound,
    /// Backend could not be reached
    Connection,
    /// Stored data could not be decoded
    InvalidData,
    /// Anything else
    Other,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::NotFound => write!(f, "not found"),
            FailureKind::Connection => write!(f, "connection"),
            FailureKind::InvalidData => write!(f, "invalid data"),
            FailureKind::Other => write!(f, "other"),
        }
    }
}

/// Errors that can occur during execution operations.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The unit of work itself failed
    #[error("Upstream failure ({kind}): {source}")]
    Upstream {
        /// Failure classification
        kind: FailureKind,
        /// Wrapped error
        source: Box<dyn StdError + Send + Sync>,
    },

    /// Worker pool refused the job
    #[error("Job rejected: {0}")]
    Rejected(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ExecError {
    /// Wrap an upstream error with its classification
    pub fn upstream(kind: FailureKind, source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::Upstream {
            kind,
            source: source.into(),
        }
    }

    /// Failure classification (`Other` for engine-level errors)
    pub fn kind(&self) -> FailureKind {
        match self {
            ExecError::Upstream { kind, .. } => *kind,
            ExecError::Rejected(_) | ExecError::Config(_) => FailureKind::Other,
        }
    }
}

/// Result type for execution operations.
pub type ExecResult<T> = Result<T, ExecError>;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_keeps_kind_and_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = ExecError::upstream(FailureKind::Connection, io);

        assert_eq!(err.kind(), FailureKind::Connection);
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "Upstream failure (connection): refused");
    }

    #[test]
    fn test_engine_errors_are_other() {
        assert_eq!(ExecError::Rejected("closed".into()).kind(), FailureKind::Other);
    }
}
