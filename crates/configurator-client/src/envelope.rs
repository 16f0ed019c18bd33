//! Response envelope shared by every API endpoint.

use crate::error::{ClientError, Result};
use serde::Deserialize;

/// `{ success, data, message, code }` wrapper around every API response.
///
/// Absent optional fields deserialize as `None`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the operation succeeded
    pub success: bool,
    /// Payload on success
    pub data: Option<T>,
    /// Human-readable message, usually set on failure
    pub message: Option<String>,
    /// Machine-readable code, usually set on failure
    pub code: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Unwrap the payload, turning `success: false` into an API error.
    pub fn into_data(self, endpoint: &str) -> Result<T> {
        self.check(endpoint)?
            .data
            .ok_or_else(|| ClientError::MissingData {
                endpoint: endpoint.to_string(),
            })
    }

    /// Check for success, ignoring any payload.
    pub fn into_unit(self, endpoint: &str) -> Result<()> {
        self.check(endpoint).map(|_| ())
    }

    fn check(self, endpoint: &str) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(ClientError::Api {
                endpoint: endpoint.to_string(),
                message: self
                    .message
                    .unwrap_or_else(|| "request was not successful".to_string()),
                code: self.code,
            })
        }
    }
}
