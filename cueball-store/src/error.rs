//! Storage layer errors

use cueball_codec::CodecError;
use cueball_domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the storage layer
#[derive(Debug, Error)]
pub enum StoreError {
    /// Entity not found
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        /// Type of entity (match, turn)
        entity_type: String,
        /// Entity ID
        id: String,
    },

    /// Duplicate entity
    #[error("Duplicate entity: {entity_type} with id {id}")]
    Duplicate {
        /// Type of entity
        entity_type: String,
        /// Entity ID
        id: String,
    },

    /// Serialization error (writing a document)
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization error (reading a document)
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Record could not be mapped to or from the domain
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Domain error passthrough
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}

impl StoreError {
    /// Create a not found error
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    /// Create a duplicate error
    pub fn duplicate(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::Duplicate {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    /// Whether the error means the data on file could not be read back
    pub fn is_invalid_data(&self) -> bool {
        matches!(self, Self::Deserialization(_) | Self::Codec(_))
    }
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;
