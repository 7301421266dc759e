//! Error types for the HTTP client

use thiserror::Error;

/// Errors that can occur while talking to the Web API
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network or connection failure, including timeouts
    #[error("Network/HTTP error: {0}")]
    Network(String),

    /// The server answered with a status other than 200
    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    /// The response body is not a valid response envelope
    #[error("Response parsing error: {0}")]
    Parse(String),

    /// The envelope reported `success: false`
    #[error("API error {code}: {message}")]
    Vendor { code: i64, message: String },
}

impl HttpError {
    /// Vendor error code, if this is a structured API failure
    pub fn vendor_code(&self) -> Option<i64> {
        match self {
            HttpError::Vendor { code, .. } => Some(*code),
            _ => None,
        }
    }
}
