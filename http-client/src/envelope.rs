//! The `{success, error, data}` wrapper every Web API response uses.

use serde::Deserialize;
use serde_json::Value;

use crate::HttpError;

/// Message used for error codes outside the fixed table
pub const UNKNOWN_ERROR_MESSAGE: &str = "unknown";

/// Human-readable message for a common Web API error code (100-107).
pub fn vendor_message(code: i64) -> Option<&'static str> {
    let message = match code {
        100 => "Unknown error",
        101 => "Invalid parameter",
        102 => "API does not exist",
        103 => "Method does not exist",
        104 => "Version unsupported",
        105 => "No permission",
        106 => "Session timeout",
        107 => "Session interrupted by duplicate login",
        _ => return None,
    };
    Some(message)
}

/// Response envelope as sent by the server
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default)]
    pub error: Option<EnvelopeError>,
    #[serde(default)]
    pub data: Option<Value>,
}

/// Error object carried by a failed envelope
#[derive(Debug, Clone, Deserialize)]
pub struct EnvelopeError {
    pub code: i64,
}

impl Envelope {
    /// Parse an envelope from a raw response body
    pub fn parse(body: &str) -> Result<Self, HttpError> {
        serde_json::from_str(body).map_err(|e| HttpError::Parse(e.to_string()))
    }

    /// Turn the envelope into its payload or a typed vendor error.
    ///
    /// A successful envelope without `data` yields `None`, which is the
    /// normal answer to control calls.
    pub fn into_result(self) -> Result<Option<Value>, HttpError> {
        if self.success {
            return Ok(self.data);
        }

        // A failure without an error object is reported as the generic code
        let code = self.error.map(|e| e.code).unwrap_or(100);
        let message = vendor_message(code).unwrap_or(UNKNOWN_ERROR_MESSAGE);
        Err(HttpError::Vendor {
            code,
            message: message.to_string(),
        })
    }
}
