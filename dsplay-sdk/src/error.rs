use dsplay_api::{ApiError, Mode};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SdkError {
    /// The server could not be reached or answered with a bad HTTP status
    #[error("Transport error: {0}")]
    Transport(String),

    /// The Web API rejected a call
    #[error("API error {code}: {message}")]
    Vendor { code: i64, message: String },

    /// Login was rejected
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// No device is available or selected in a mode
    #[error("No {0} device available")]
    NoDevice(Mode),

    /// The selected device is unknown even after a registry refresh
    #[error("Unknown {mode} device '{device_id}'")]
    UnknownDevice { mode: Mode, device_id: String },

    /// A library reference or play token is malformed
    #[error("Parse error: {0}")]
    Parse(String),

    /// A library lookup had no match
    #[error("Not found: {0}")]
    NotFound(String),

    /// The server answered with data of an unexpected shape
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SdkError {
    /// Whether the error reports an expired or displaced session
    pub fn is_session_error(&self) -> bool {
        matches!(
            self,
            SdkError::Vendor { code, .. }
                if *code == ApiError::SESSION_TIMEOUT || *code == ApiError::SESSION_INTERRUPTED
        )
    }
}

impl From<ApiError> for SdkError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::NetworkError(msg) => SdkError::Transport(msg),
            ApiError::HttpStatus(code) => SdkError::Transport(format!("HTTP status {}", code)),
            ApiError::ParseError(msg) | ApiError::DecodeError(msg) => SdkError::InvalidResponse(msg),
            ApiError::VendorError { code, message } => SdkError::Vendor { code, message },
            e @ (ApiError::UnknownApi(_) | ApiError::PathTable(_) | ApiError::InvalidParameter(_)) => {
                SdkError::Config(e.to_string())
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, SdkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_conversion() {
        let err: SdkError = ApiError::NetworkError("refused".to_string()).into();
        assert!(matches!(err, SdkError::Transport(_)));

        let err: SdkError = ApiError::HttpStatus(503).into();
        assert_eq!(err.to_string(), "Transport error: HTTP status 503");

        let err: SdkError = ApiError::DecodeError("missing field".to_string()).into();
        assert!(matches!(err, SdkError::InvalidResponse(_)));

        let err: SdkError = ApiError::UnknownApi("SYNO.X".to_string()).into();
        assert!(matches!(err, SdkError::Config(_)));
    }

    #[test]
    fn test_session_error_detection() {
        let err: SdkError = ApiError::VendorError {
            code: 107,
            message: "Session interrupted by duplicate login".to_string(),
        }
        .into();
        assert!(err.is_session_error());
        assert!(!SdkError::NoDevice(Mode::Audio).is_session_error());
    }

    #[test]
    fn test_error_display() {
        let err = SdkError::UnknownDevice {
            mode: Mode::Video,
            device_id: "dev-9".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown video device 'dev-9'");
        assert_eq!(SdkError::NoDevice(Mode::Audio).to_string(), "No audio device available");
    }
}
