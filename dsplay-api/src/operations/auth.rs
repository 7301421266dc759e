//! Authentication and API discovery

use serde::Deserialize;
use serde_json::Value;

use crate::define_ds_operation;

define_ds_operation! {
    /// Log in and open a named session
    operation: LoginOperation,
    api: "SYNO.API.Auth",
    method: "login",
    version: 2,
    request: {
        account: String => "account",
        passwd: String => "passwd",
        session: String => "session",
    },
    fixed: {
        "format" => "sid",
    },
    response: LoginResponse,
}

/// Payload of a successful login
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub sid: String,
}

define_ds_operation! {
    /// List every API the server exposes with its path
    operation: ApiInfoQueryOperation,
    api: "SYNO.API.Info",
    method: "query",
    version: 1,
    request: {},
    fixed: {
        "query" => "all",
    },
    response: Value,
}

/// Path of the info API, which has to be known before any table exists
pub const API_INFO_PATH: &str = "query.cgi";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DsOperation;
    use serde_json::json;

    #[test]
    fn test_login_request() {
        let request = LoginOperation {
            account: "admin".to_string(),
            passwd: "secret".to_string(),
            session: "VideoStation".to_string(),
        }
        .request();

        assert_eq!(request.api(), "SYNO.API.Auth");
        assert_eq!(request.method(), "login");
        assert_eq!(request.version(), 2);
        assert_eq!(request.get_param("account"), Some("admin"));
        assert_eq!(request.get_param("session"), Some("VideoStation"));
        assert_eq!(request.get_param("format"), Some("sid"));
    }

    #[test]
    fn test_login_response() {
        let response = LoginOperation::parse_response(Some(json!({"sid": "abc"}))).unwrap();
        assert_eq!(response.sid, "abc");
    }

    #[test]
    fn test_login_response_without_sid() {
        assert!(LoginOperation::parse_response(Some(json!({}))).is_err());
    }
}
