//! Error types for autumn-core.

use crate::ids::IdError;

/// Result type for autumn-core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can occur when building or decoding Autumn types.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Invalid identifier.
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] IdError),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
