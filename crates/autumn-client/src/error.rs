//! Client error types.

use autumn_core::IdError;

/// Errors that can occur when using the Autumn client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error response.
    #[error("API error: {code} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error code.
        code: String,
        /// Error message.
        message: String,
    },

    /// Customer does not exist.
    #[error("customer not found: {customer_id}")]
    CustomerNotFound {
        /// The customer ID.
        customer_id: String,
    },

    /// Customer already exists.
    #[error("customer already exists: {customer_id}")]
    CustomerAlreadyExists {
        /// The customer ID.
        customer_id: String,
    },

    /// Too many requests.
    #[error("rate limit exceeded")]
    RateLimited {
        /// Seconds to wait, if the server said.
        retry_after: Option<u64>,
    },

    /// Invalid identifier.
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] IdError),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Whether the error means the requested customer does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::CustomerNotFound { .. } => true,
            Self::Api { status, .. } => *status == 404,
            _ => false,
        }
    }

    /// HTTP status code associated with the error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::CustomerNotFound { .. } => Some(404),
            Self::CustomerAlreadyExists { .. } => Some(409),
            Self::RateLimited { .. } => Some(429),
            Self::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
