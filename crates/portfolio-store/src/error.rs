//! Store error types

use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A required field is absent or a value is out of its domain
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Ownership-scoped lookup miss (absent and not-yours are the same)
    #[error("{0} not found")]
    NotFound(String),

    /// Unique key already taken
    #[error("Already exists: {0}")]
    Conflict(String),

    /// A stored document no longer decodes as its record type
    #[error("Corrupt document: {0}")]
    Corrupt(String),

    #[error("Invalid upload name: {0}")]
    InvalidName(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage backend error: {0}")]
    Backend(String),

    #[cfg(feature = "sqlite")]
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl StoreError {
    pub(crate) fn poisoned() -> Self {
        StoreError::Backend("lock poisoned".into())
    }
}
