//! Core error types for Quotabar.

use thiserror::Error;

/// Core error type for Quotabar value-object operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Unknown provider name.
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// Invalid data in a usage reading.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
