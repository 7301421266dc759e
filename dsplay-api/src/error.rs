use http_client::HttpError;
use thiserror::Error;

/// High-level API errors for DiskStation operations
///
/// This enum abstracts away the HTTP plumbing and gives callers the
/// failure categories they actually act on: the device could not be
/// reached, it answered with something unusable, or the Web API itself
/// rejected the call with a numeric error code.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network communication error
    ///
    /// Connection refused, DNS failures and timeouts all land here.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The server answered with an HTTP status other than 200
    #[error("HTTP status {0}")]
    HttpStatus(u16),

    /// The response body is not a valid response envelope
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The Web API reported `success: false`
    ///
    /// `message` is the fixed text for codes 100-107 and `"unknown"`
    /// for anything else.
    #[error("API error {code}: {message}")]
    VendorError { code: i64, message: String },

    /// The envelope payload does not have the shape the operation expects
    #[error("Unexpected response data: {0}")]
    DecodeError(String),

    /// No HTTP path is known for a logical API name
    #[error("Unknown API '{0}': not present in the API path table")]
    UnknownApi(String),

    /// The API path table could not be read
    #[error("API path table error: {0}")]
    PathTable(String),

    /// Invalid parameter value
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl ApiError {
    /// Vendor code reporting that the session is gone
    pub const SESSION_TIMEOUT: i64 = 106;
    /// Vendor code reporting a duplicate login elsewhere
    pub const SESSION_INTERRUPTED: i64 = 107;

    /// Whether this error means the current session id is no longer valid
    pub fn is_session_error(&self) -> bool {
        matches!(
            self,
            ApiError::VendorError { code, .. }
                if *code == Self::SESSION_TIMEOUT || *code == Self::SESSION_INTERRUPTED
        )
    }
}

/// Type alias for results that can return an ApiError
pub type Result<T> = std::result::Result<T, ApiError>;

/// Convert from HttpError to ApiError
impl From<HttpError> for ApiError {
    fn from(error: HttpError) -> Self {
        match error {
            HttpError::Network(msg) => ApiError::NetworkError(msg),
            HttpError::Status(code) => ApiError::HttpStatus(code),
            HttpError::Parse(msg) => ApiError::ParseError(msg),
            HttpError::Vendor { code, message } => ApiError::VendorError { code, message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_http_error_conversion() {
        let api_error: ApiError = HttpError::Network("connection timeout".to_string()).into();
        assert!(matches!(api_error, ApiError::NetworkError(_)));

        let api_error: ApiError = HttpError::Status(500).into();
        assert!(matches!(api_error, ApiError::HttpStatus(500)));

        let api_error: ApiError = HttpError::Parse("invalid JSON".to_string()).into();
        assert!(matches!(api_error, ApiError::ParseError(_)));

        let api_error: ApiError = HttpError::Vendor {
            code: 105,
            message: "No permission".to_string(),
        }
        .into();
        assert!(matches!(api_error, ApiError::VendorError { code: 105, .. }));
    }

    #[rstest]
    #[case(106, true)]
    #[case(107, true)]
    #[case(105, false)]
    #[case(100, false)]
    fn test_is_session_error(#[case] code: i64, #[case] expected: bool) {
        let error = ApiError::VendorError {
            code,
            message: String::new(),
        };
        assert_eq!(error.is_session_error(), expected);
    }

    #[test]
    fn test_network_error_is_not_session_error() {
        assert!(!ApiError::NetworkError("down".to_string()).is_session_error());
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::VendorError {
            code: 106,
            message: "Session timeout".to_string(),
        };
        assert_eq!(format!("{}", err), "API error 106: Session timeout");

        let err = ApiError::UnknownApi("SYNO.Foo".to_string());
        assert_eq!(
            format!("{}", err),
            "Unknown API 'SYNO.Foo': not present in the API path table"
        );
    }
}
