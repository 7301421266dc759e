//! Controller configuration
//!
//! Loaded from a JSON file, by default `<config dir>/dsplay/config.json`,
//! with `DSPLAY_URL`, `DSPLAY_ACCOUNT` and `DSPLAY_PASSWORD` taking
//! precedence over the file.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use dsplay_api::{Mode, Timeouts};
use serde::Deserialize;

use crate::session::Credentials;
use crate::{Result, SdkError};

pub const DEFAULT_BASE_URL: &str = "http://diskstation:5000/webapi";

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// The `webapi` root of the DiskStation
    pub base_url: String,
    pub account: String,
    pub password: String,
    /// Preferred Audio Station player
    pub audio_device: Option<String>,
    /// Preferred Video Station device
    pub video_device: Option<String>,
    /// API path table file; the built-in table is used when unset
    pub api_paths: Option<PathBuf>,
    /// Ask the server for its API path table when no file is set
    pub discover_api_paths: bool,
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
    pub initial_mode: Mode,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            account: String::new(),
            password: String::new(),
            audio_device: None,
            video_device: None,
            api_paths: None,
            discover_api_paths: false,
            connect_timeout_secs: 5,
            timeout_secs: 10,
            initial_mode: Mode::Video,
        }
    }
}

impl fmt::Debug for ControllerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerConfig")
            .field("base_url", &self.base_url)
            .field("account", &self.account)
            .field("password", &"***")
            .field("audio_device", &self.audio_device)
            .field("video_device", &self.video_device)
            .field("api_paths", &self.api_paths)
            .field("discover_api_paths", &self.discover_api_paths)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("timeout_secs", &self.timeout_secs)
            .field("initial_mode", &self.initial_mode)
            .finish()
    }
}

impl ControllerConfig {
    /// `<config dir>/dsplay/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("dsplay").join("config.json"))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SdkError::Config(e.to_string()))
    }

    /// Read a config file, apply environment overrides and validate
    ///
    /// A missing file at the default location is not an error when the
    /// environment supplies the rest.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let explicit = path.map(Path::to_path_buf);
        let path = explicit.clone().or_else(Self::default_path);

        let mut config = match path {
            Some(path) if path.exists() => {
                let json = std::fs::read_to_string(&path)
                    .map_err(|e| SdkError::Config(format!("{}: {}", path.display(), e)))?;
                Self::from_json(&json)?
            }
            Some(path) if explicit.is_some() => {
                return Err(SdkError::Config(format!("{} does not exist", path.display())));
            }
            _ => Self::default(),
        };

        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Apply `DSPLAY_URL`, `DSPLAY_ACCOUNT` and `DSPLAY_PASSWORD`
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F: Fn(&str) -> Option<String>>(&mut self, lookup: F) {
        if let Some(url) = lookup("DSPLAY_URL") {
            self.base_url = url;
        }
        if let Some(account) = lookup("DSPLAY_ACCOUNT") {
            self.account = account;
        }
        if let Some(password) = lookup("DSPLAY_PASSWORD") {
            self.password = password;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.account.trim().is_empty() {
            return Err(SdkError::Config("account must not be empty".to_string()));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(SdkError::Config(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        if self.connect_timeout_secs == 0 || self.timeout_secs == 0 {
            return Err(SdkError::Config("timeouts must be greater than zero".to_string()));
        }
        Ok(())
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.account.clone(), self.password.clone())
    }

    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            connect: Duration::from_secs(self.connect_timeout_secs),
            request: Duration::from_secs(self.timeout_secs),
        }
    }

    /// Configured room name of a mode
    pub fn preferred_device(&self, mode: Mode) -> Option<&str> {
        match mode {
            Mode::Audio => self.audio_device.as_deref(),
            Mode::Video => self.video_device.as_deref(),
        }
    }
}
