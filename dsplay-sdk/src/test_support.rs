//! Scripted transport for exercising the controller without a server
//!
//! Every request is recorded, and answered by a closure, so tests can
//! assert exactly how many logins or device listings a call triggered.

use std::cell::RefCell;

use dsplay_api::{vendor_message, ApiError, ApiPathTable, DsRequest, Transport};
use serde_json::{json, Value};

type Handler = Box<dyn Fn(&DsRequest) -> Result<Option<Value>, ApiError>>;

pub struct ScriptedTransport {
    handler: Handler,
    log: RefCell<Vec<DsRequest>>,
    paths: ApiPathTable,
}

impl ScriptedTransport {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&DsRequest) -> Result<Option<Value>, ApiError> + 'static,
    {
        Self {
            handler: Box::new(handler),
            log: RefCell::new(Vec::new()),
            paths: ApiPathTable::builtin(),
        }
    }

    /// All requests sent so far
    pub fn requests(&self) -> Vec<DsRequest> {
        self.log.borrow().clone()
    }

    /// Number of requests sent for an API method
    pub fn count(&self, api: &str, method: &str) -> usize {
        self.log
            .borrow()
            .iter()
            .filter(|r| r.api() == api && r.method() == method)
            .count()
    }

    /// Most recent request for an API method
    pub fn last(&self, api: &str, method: &str) -> Option<DsRequest> {
        self.log
            .borrow()
            .iter()
            .rev()
            .find(|r| r.api() == api && r.method() == method)
            .cloned()
    }

    pub fn logins(&self) -> usize {
        self.count("SYNO.API.Auth", "login")
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: &DsRequest) -> Result<Option<Value>, ApiError> {
        self.log.borrow_mut().push(request.clone());
        (self.handler)(request)
    }

    fn url_for(&self, request: &DsRequest) -> Result<String, ApiError> {
        let path = self.paths.path_for(request.api()).unwrap_or("entry.cgi");
        request.to_url(&format!("http://ds.test/webapi/{}", path))
    }
}

/// Successful login payload, with a sid derived from the session name
pub fn login_response(request: &DsRequest) -> Option<Value> {
    let session = request.get_param("session").unwrap_or("default");
    Some(json!({ "sid": format!("sid-{}", session) }))
}

/// Vendor error as the HTTP layer would report it
pub fn vendor_error(code: i64) -> ApiError {
    ApiError::VendorError {
        code,
        message: vendor_message(code).unwrap_or("unknown").to_string(),
    }
}

/// Transport failure as the HTTP layer would report it
pub fn network_error(message: &str) -> ApiError {
    ApiError::NetworkError(message.to_string())
}
