/*
    errors.rs - Error types for the document store

    Every backend failure (open, pool, query, blocking task) is reported as
    Unavailable; a record that no longer decodes is reported as Corrupted.
*/

use thiserror::Error;

/// Errors that can occur in the document store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend could not be opened, read or written
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A stored record failed to decode
    #[error("Corrupted record {key}: {reason}")]
    Corrupted { key: String, reason: String },
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

impl From<r2d2::Error> for StoreError {
    fn from(err: r2d2::Error) -> Self {
        StoreError::Unavailable(format!("Failed to get connection: {}", err))
    }
}

impl From<tokio::task::JoinError> for StoreError {
    fn from(err: tokio::task::JoinError) -> Self {
        StoreError::Unavailable(format!("Task join error: {}", err))
    }
}
