//! Per-mode login sessions
//!
//! Each mode logs in under its own session name and keeps its own sid.
//! Sessions are acquired lazily on the first call that needs one and
//! dropped when the server reports them expired or displaced.

use std::fmt;

use dsplay_api::operations::auth::LoginOperation;
use dsplay_api::{ApiError, Mode, Transport};
use tracing::{info, warn};

use crate::{Result, SdkError};

/// Account used to log in
#[derive(Clone)]
pub struct Credentials {
    pub account: String,
    pub password: String,
}

impl Credentials {
    pub fn new(account: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("account", &self.account)
            .field("password", &"***")
            .finish()
    }
}

/// Login state of one mode
#[derive(Debug, Clone)]
pub struct Session {
    mode: Mode,
    sid: Option<String>,
    session_name: String,
}

impl Session {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            sid: None,
            session_name: mode.session_name().to_string(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn sid(&self) -> Option<&str> {
        self.sid.as_deref()
    }

    pub fn session_name(&self) -> &str {
        &self.session_name
    }

    pub fn is_active(&self) -> bool {
        self.sid.is_some()
    }
}

/// Owns the credentials and the session of every mode
#[derive(Debug)]
pub struct SessionManager {
    credentials: Credentials,
    audio: Session,
    video: Session,
}

impl SessionManager {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            audio: Session::new(Mode::Audio),
            video: Session::new(Mode::Video),
        }
    }

    pub fn session(&self, mode: Mode) -> &Session {
        match mode {
            Mode::Audio => &self.audio,
            Mode::Video => &self.video,
        }
    }

    fn session_mut(&mut self, mode: Mode) -> &mut Session {
        match mode {
            Mode::Audio => &mut self.audio,
            Mode::Video => &mut self.video,
        }
    }

    /// Current sid of a mode, if logged in
    pub fn sid(&self, mode: Mode) -> Option<&str> {
        self.session(mode).sid()
    }

    /// Log in for a mode and store the new sid
    ///
    /// A rejected login surfaces as [`SdkError::Auth`]; transport failures
    /// keep their own variant.
    pub fn authenticate<T: Transport>(&mut self, transport: &T, mode: Mode) -> Result<String> {
        let session_name = self.session(mode).session_name().to_string();
        let login = LoginOperation {
            account: self.credentials.account.clone(),
            passwd: self.credentials.password.clone(),
            session: session_name.clone(),
        };

        let response = transport.execute(&login).map_err(|e| match e {
            ApiError::VendorError { code, message } => SdkError::Auth(format!(
                "login to {} as '{}' rejected: {} (code {})",
                session_name, self.credentials.account, message, code
            )),
            other => SdkError::from(other),
        })?;

        info!(mode = %mode, session = %session_name, "authenticated");
        self.session_mut(mode).sid = Some(response.sid.clone());
        Ok(response.sid)
    }

    /// Cached sid of a mode, logging in first when there is none
    pub fn ensure<T: Transport>(&mut self, transport: &T, mode: Mode) -> Result<String> {
        match self.sid(mode) {
            Some(sid) => Ok(sid.to_string()),
            None => self.authenticate(transport, mode),
        }
    }

    /// Forget the sid of a mode; the next call logs in again
    pub fn invalidate(&mut self, mode: Mode) {
        if self.session_mut(mode).sid.take().is_some() {
            warn!(mode = %mode, "session invalidated");
        }
    }
}
