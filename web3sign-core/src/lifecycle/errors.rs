//! Error types for the lifecycle engine

use crate::store::StoreError;
use thiserror::Error;

/// Result type for lifecycle operations
pub type LifecycleResult<T> = Result<T, LifecycleError>;

/// EIP-1193 code for a request the user declined in their wallet
pub const USER_REJECTED_REQUEST: i64 = 4001;

/// EIP-1193 code for a method or account that has not been authorized
pub const UNAUTHORIZED: i64 = 4100;

/// Errors that can occur in lifecycle flows and the collaborators they call
#[derive(Error, Debug)]
pub enum LifecycleError {
    /// Local record store could not be opened, read or written
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Wallet declined or has no authorized account
    #[error("Wallet request rejected ({code}): {reason}")]
    AuthRejected { code: i64, reason: String },

    /// Upload or download transport failed
    #[error("Network failure: {0}")]
    NetworkFailure(String),

    /// Encryption or decryption failed
    #[error("Encryption failure: {0}")]
    EncryptionFailure(String),

    /// Operation invoked on a missing key or unusable document
    #[error("Validation failure: {0}")]
    ValidationFailure(String),
}

impl LifecycleError {
    /// The user declined a wallet prompt
    pub fn user_rejected(reason: impl Into<String>) -> Self {
        LifecycleError::AuthRejected {
            code: USER_REJECTED_REQUEST,
            reason: reason.into(),
        }
    }

    /// No wallet account has been authorized for this app
    pub fn unauthorized(reason: impl Into<String>) -> Self {
        LifecycleError::AuthRejected {
            code: UNAUTHORIZED,
            reason: reason.into(),
        }
    }

    /// Stable snake_case tag for user-facing error messages
    pub fn kind(&self) -> &'static str {
        match self {
            LifecycleError::StorageUnavailable(_) => "storage_unavailable",
            LifecycleError::AuthRejected { .. } => "auth_rejected",
            LifecycleError::NetworkFailure(_) => "network_failure",
            LifecycleError::EncryptionFailure(_) => "encryption_failure",
            LifecycleError::ValidationFailure(_) => "validation_failure",
        }
    }
}

impl From<StoreError> for LifecycleError {
    fn from(e: StoreError) -> Self {
        LifecycleError::StorageUnavailable(e.to_string())
    }
}

impl From<serde_json::Error> for LifecycleError {
    fn from(e: serde_json::Error) -> Self {
        LifecycleError::EncryptionFailure(format!("Malformed payload: {}", e))
    }
}
