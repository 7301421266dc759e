//! Session-aware request path
//!
//! Every call that needs a sid goes through [`Gateway::perform`]. It adds
//! the mode's sid, logging in first when there is none, and drops the
//! session when the server answers with a session error. It never replays
//! the failed call: the error reaches the caller and the next call logs
//! in again.

use dsplay_api::{ApiError, DsOperation, DsRequest, Mode, Transport, SID_PARAM};
use serde_json::Value;
use tracing::debug;

use crate::session::{Credentials, SessionManager};
use crate::{Result, SdkError};

#[derive(Debug)]
pub struct Gateway<T: Transport> {
    transport: T,
    sessions: SessionManager,
}

impl<T: Transport> Gateway<T> {
    pub fn new(transport: T, credentials: Credentials) -> Self {
        Self {
            transport,
            sessions: SessionManager::new(credentials),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Send a request under the session of `mode`
    ///
    /// A request that already carries a sid is sent as is.
    pub fn perform(&mut self, mode: Mode, mut request: DsRequest) -> Result<Option<Value>> {
        if !request.has_param(SID_PARAM) {
            let sid = self.sessions.ensure(&self.transport, mode)?;
            request.set_param(SID_PARAM, sid);
        }

        debug!(mode = %mode, api = request.api(), method = request.method(), "perform");
        self.transport
            .send(&request)
            .map_err(|e| self.observe(mode, e))
    }

    /// Send a typed operation under the session of `mode`
    pub fn execute<Op: DsOperation>(&mut self, mode: Mode, operation: &Op) -> Result<Op::Response> {
        let data = self.perform(mode, operation.request())?;
        Ok(Op::parse_response(data)?)
    }

    /// URL of a request that embeds the current sid of `mode`
    ///
    /// Logs in first when needed, since the link is useless without a
    /// valid sid.
    pub fn signed_url<F>(&mut self, mode: Mode, build: F) -> Result<String>
    where
        F: FnOnce(&str) -> DsRequest,
    {
        let sid = self.sessions.ensure(&self.transport, mode)?;
        Ok(self.transport.url_for(&build(&sid))?)
    }

    fn observe(&mut self, mode: Mode, error: ApiError) -> SdkError {
        if error.is_session_error() {
            self.sessions.invalidate(mode);
        }
        error.into()
    }
}
