//! Application error types and user-facing messages.

use cueball_codec::CodecError;
use cueball_exec::{ExecError, FailureKind};
use cueball_store::StoreError;
use thiserror::Error;

/// Fallback when an error carries no message
pub const UNKNOWN_ERROR: &str = "Unknown Error";

/// Application-level errors.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading an input file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input is not a match record
    #[error("Invalid match record: {0}")]
    InvalidRecord(String),

    /// Record could not be mapped to a match
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
}

/// Result type for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Classify a repository failure.
pub fn failure_kind(err: &StoreError) -> FailureKind {
    match err {
        StoreError::NotFound { .. } => FailureKind::NotFound,
        StoreError::Connection(_) => FailureKind::Connection,
        e if e.is_invalid_data() => FailureKind::InvalidData,
        _ => FailureKind::Other,
    }
}

/// Wrap a repository failure for delivery through the executor.
pub fn upstream(err: StoreError) -> ExecError {
    ExecError::upstream(failure_kind(&err), err)
}

/// Message suitable for showing to the user.
pub fn user_message(err: &ExecError) -> String {
    match err.kind() {
        FailureKind::NotFound => "That match no longer exists.".to_string(),
        FailureKind::Connection => "Unable to reach the match store. Try again later.".to_string(),
        FailureKind::InvalidData => "The stored match could not be read.".to_string(),
        FailureKind::Other => match err {
            ExecError::Upstream { source, .. } => non_empty(source.to_string()),
            _ => UNKNOWN_ERROR.to_string(),
        },
    }
}

fn non_empty(message: String) -> String {
    if message.trim().is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        message
    }
}

// =============================================================================
// Tests
// =============================================================================
