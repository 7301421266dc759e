//! Operation framework
//!
//! Each Web API call the core makes is a type implementing [`DsOperation`]:
//! the struct fields are its parameters, the associated constants name the
//! API, method and version, and `Response` is the shape of the `data`
//! payload. Most operations are declared with
//! [`define_ds_operation!`](crate::define_ds_operation).

pub mod macros;

use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::ApiError;
use crate::request::DsRequest;

/// Base trait for all DiskStation Web API operations
pub trait DsOperation {
    /// The shape of the envelope `data` member
    type Response: DeserializeOwned;

    /// Logical API name (e.g. `SYNO.VideoStation2.Movie`)
    const API: &'static str;

    /// API method (e.g. `getinfo`)
    const METHOD: &'static str;

    /// API version the parameters are written for
    const VERSION: u32;

    /// Call-specific query parameters, in wire order
    fn params(&self) -> Vec<(&'static str, String)>;

    /// Build the request for this operation
    fn request(&self) -> DsRequest {
        self.params()
            .into_iter()
            .fold(DsRequest::new(Self::API, Self::METHOD, Self::VERSION), |req, (k, v)| {
                req.param(k, v)
            })
    }

    /// Decode the envelope payload into the typed response
    ///
    /// A missing payload is decoded from `null`.
    fn parse_response(data: Option<Value>) -> Result<Self::Response, ApiError> {
        serde_json::from_value(data.unwrap_or(Value::Null)).map_err(|e| {
            ApiError::DecodeError(format!("{} {}: {}", Self::API, Self::METHOD, e))
        })
    }
}

/// Response of control calls whose payload, if any, carries nothing of use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoContent;

impl<'de> Deserialize<'de> for NoContent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        IgnoredAny::deserialize(deserializer)?;
        Ok(NoContent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct ProbeOperation {
        id: u32,
    }

    #[derive(Debug, Deserialize)]
    struct ProbeResponse {
        total: u32,
    }

    impl DsOperation for ProbeOperation {
        type Response = ProbeResponse;
        const API: &'static str = "SYNO.Probe";
        const METHOD: &'static str = "get";
        const VERSION: u32 = 3;

        fn params(&self) -> Vec<(&'static str, String)> {
            vec![("id", self.id.to_string())]
        }
    }

    #[test]
    fn test_request_from_operation() {
        let request = ProbeOperation { id: 9 }.request();
        assert_eq!(request.api(), "SYNO.Probe");
        assert_eq!(request.method(), "get");
        assert_eq!(request.version(), 3);
        assert_eq!(request.get_param("id"), Some("9"));
    }

    #[test]
    fn test_parse_response() {
        let response = ProbeOperation::parse_response(Some(json!({"total": 4}))).unwrap();
        assert_eq!(response.total, 4);
    }

    #[test]
    fn test_parse_response_missing_data() {
        let err = ProbeOperation::parse_response(None).unwrap_err();
        match err {
            ApiError::DecodeError(msg) => assert!(msg.starts_with("SYNO.Probe get")),
            other => panic!("Expected DecodeError, got {:?}", other),
        }
    }

    #[test]
    fn test_no_content_accepts_anything() {
        let _: NoContent = serde_json::from_value(Value::Null).unwrap();
        let _: NoContent = serde_json::from_value(json!({"updated": 1})).unwrap();
    }
}
