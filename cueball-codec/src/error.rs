//! Codec error types.

use cueball_domain::{DomainError, GameType};
use thiserror::Error;

/// Errors raised while encoding or decoding stored records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Ordinal does not name a member of the enumeration
    #[error("Invalid ordinal {ordinal} for {enumeration}")]
    InvalidOrdinal {
        /// Enumeration being decoded
        enumeration: &'static str,
        /// Offending ordinal (or bit position)
        ordinal: i64,
    },

    /// Stored text could not be parsed
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// Ball count does not match the game type's table
    #[error("Size mismatch for {game_type}: expected {expected} balls, got {actual}")]
    SizeMismatch {
        /// Declared game type
        game_type: GameType,
        /// Table size of the game type
        expected: usize,
        /// Number of ball states present
        actual: usize,
    },

    /// Enumeration is too large to pack into a signed 32-bit mask
    #[error("{enumeration} has {members} members, bitmask supports at most 31")]
    EnumTooLarge {
        /// Enumeration being encoded
        enumeration: &'static str,
        /// Member count
        members: usize,
    },

    /// Game type has no table layout
    #[error("Unsupported game type: {0}")]
    UnsupportedGameType(GameType),

    /// Domain validation failed while rebuilding an aggregate
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}

impl CodecError {
    /// Create an invalid ordinal error
    pub fn invalid_ordinal(enumeration: &'static str, ordinal: impl Into<i64>) -> Self {
        Self::InvalidOrdinal {
            enumeration,
            ordinal: ordinal.into(),
        }
    }

    /// Create a malformed record error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedRecord(message.into())
    }
}

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;
