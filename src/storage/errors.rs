//! Storage-specific error types for pure row operations.
//!
//! These errors describe persistence failures only. They carry no knowledge of
//! customers, validation or access control.

use std::fmt;

/// Errors that can occur during storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// The requested row was not found.
    NotFound { entity: String, id: u64 },

    /// Data that cannot be stored or read back as a row.
    InvalidData {
        message: String,
        cause: Option<String>,
    },

    /// Serialization or deserialization of a row failed.
    Serialization {
        message: String,
        entity: Option<String>,
    },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::NotFound { entity, id } => {
                write!(f, "Row not found: {}/{}", entity, id)
            }
            StorageError::InvalidData { message, cause } => {
                if let Some(cause) = cause {
                    write!(f, "Invalid data: {} (cause: {})", message, cause)
                } else {
                    write!(f, "Invalid data: {}", message)
                }
            }
            StorageError::Serialization { message, entity } => {
                if let Some(entity) = entity {
                    write!(f, "Serialization error for {}: {}", entity, message)
                } else {
                    write!(f, "Serialization error: {}", message)
                }
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl StorageError {
    /// Create a not-found error for a row.
    pub fn not_found(entity: impl Into<String>, id: u64) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id,
        }
    }

    /// Create a serialization error for an entity's row.
    pub fn serialization(entity: impl Into<String>, error: serde_json::Error) -> Self {
        Self::Serialization {
            message: error.to_string(),
            entity: Some(entity.into()),
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            message: error.to_string(),
            entity: None,
        }
    }
}
