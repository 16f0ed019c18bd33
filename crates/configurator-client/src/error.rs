//! Error types for the HTTP client.

use configurator_engine::StoreError;
use thiserror::Error;

/// Errors that can occur talking to the configurator API.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The API answered with `success: false`
    #[error("API error on {endpoint}: {message}")]
    Api {
        /// Endpoint path
        endpoint: String,
        /// Message returned by the API
        message: String,
        /// Machine-readable code, if any
        code: Option<String>,
    },

    /// Non-success HTTP status
    #[error("HTTP error on {endpoint}: status {status}, {message}")]
    Status {
        /// Endpoint path
        endpoint: String,
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// Successful envelope without the expected data
    #[error("response from {endpoint} carried no data")]
    MissingData {
        /// Endpoint path
        endpoint: String,
    },

    /// Response body could not be parsed
    #[error("failed to parse response from {endpoint}: {message}")]
    ParseError {
        /// Endpoint path
        endpoint: String,
        /// Parser message
        message: String,
    },

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

impl ClientError {
    /// Whether the API reported the resource as missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Status { status, .. } => *status == 404,
            Self::Api { code, .. } => code.as_deref() == Some("NOT_FOUND"),
            _ => false,
        }
    }
}

impl From<ClientError> for StoreError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Api { message, code, .. } => StoreError::Rejected { message, code },
            ClientError::Status {
                status, message, ..
            } => StoreError::Rejected {
                message,
                code: Some(status.to_string()),
            },
            ClientError::MissingData { .. } | ClientError::ParseError { .. } => {
                StoreError::InvalidResponse(err.to_string())
            }
            ClientError::Network(e) if e.is_decode() => StoreError::InvalidResponse(e.to_string()),
            ClientError::Network(e) => StoreError::Transport(e.to_string()),
            ClientError::Internal(message) => StoreError::Transport(message),
        }
    }
}
