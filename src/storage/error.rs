//! Comment store error types
//!
//! Defines all errors that can occur in the storage layer.

use thiserror::Error;

/// Errors raised by a storage backend
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// A required comment field that was empty after trimming
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Message,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::Name => write!(f, "name"),
            Field::Email => write!(f, "email"),
            Field::Message => write!(f, "message"),
        }
    }
}

/// Submitted comment failed validation; nothing was written
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Please fill in all fields ({field} is empty)")]
pub struct ValidationError {
    pub field: Field,
}

/// Errors returned by [`CommentStore::append`](super::CommentStore::append)
#[derive(Error, Debug)]
pub enum CommentError {
    /// A required field was empty
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The backend failed to persist the updated list
    #[error("Failed to save comments: {0}")]
    Storage(#[from] StorageError),
}

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
