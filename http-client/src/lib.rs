//! Private HTTP client for DiskStation Web API communication
//!
//! This crate provides a minimal blocking client for the `webapi/*.cgi`
//! endpoints: it issues GET requests with bounded timeouts, unwraps the
//! `{success, error, data}` response envelope and maps API error codes
//! to typed errors. It never retries on its own.

mod envelope;
mod error;

pub use envelope::{vendor_message, Envelope, EnvelopeError, UNKNOWN_ERROR_MESSAGE};
pub use error::HttpError;

use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Parameter names whose values must never reach the logs
const REDACTED_PARAMS: &[&str] = &["_sid", "passwd"];

/// Connection and request timeouts used by [`HttpClient`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Time allowed to establish the TCP connection
    pub connect: Duration,
    /// Upper bound for the whole request, connection included
    pub request: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(5),
            request: Duration::from_secs(10),
        }
    }
}

/// A minimal blocking client for the Web API
#[derive(Debug, Clone)]
pub struct HttpClient {
    agent: ureq::Agent,
}

impl HttpClient {
    /// Create a new client with default timeouts
    pub fn new() -> Self {
        Self::with_timeouts(Timeouts::default())
    }

    /// Create a client with explicit timeouts
    pub fn with_timeouts(timeouts: Timeouts) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout_connect(timeouts.connect)
                .timeout(timeouts.request)
                .build(),
        }
    }

    /// Send a GET request and return the envelope payload
    ///
    /// # Arguments
    /// * `url` - Full endpoint URL (e.g. `http://diskstation:5000/webapi/entry.cgi`)
    /// * `params` - Query parameters, sent in the given order
    ///
    /// # Returns
    /// The `data` member of a successful envelope, `None` when absent
    pub fn get(&self, url: &str, params: &[(String, String)]) -> Result<Option<Value>, HttpError> {
        debug!(url = %url, params = %redact(params), "GET");

        let mut request = self.agent.get(url);
        for (key, value) in params {
            request = request.query(key, value);
        }

        let response = match request.call() {
            Ok(response) => response,
            Err(ureq::Error::Status(code, _)) => return Err(HttpError::Status(code)),
            Err(e) => return Err(HttpError::Network(e.to_string())),
        };

        if response.status() != 200 {
            return Err(HttpError::Status(response.status()));
        }

        let body = response
            .into_string()
            .map_err(|e| HttpError::Network(e.to_string()))?;

        Envelope::parse(&body)?.into_result()
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Render query parameters for logging with credentials masked
pub fn redact(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(key, value)| {
            if REDACTED_PARAMS.contains(&key.as_str()) {
                format!("{}=***", key)
            } else {
                format!("{}={}", key, value)
            }
        })
        .collect::<Vec<_>>()
        .join("&")
}
