//! Logging setup for applications built on the SDK
//!
//! The SDK itself only emits `tracing` events; binaries pick how they are
//! shown by calling one of the init functions here once at startup.

use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Logging mode for different use cases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggingMode {
    /// No output
    Silent,
    /// Compact stderr output
    Development,
    /// Verbose output with source locations
    Debug,
}

impl LoggingMode {
    /// Parse a `DSPLAY_LOG_MODE` value; anything unknown is silent
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value.map(str::to_ascii_lowercase).as_deref() {
            Some("development") | Some("dev") => LoggingMode::Development,
            Some("debug") => LoggingMode::Debug,
            _ => LoggingMode::Silent,
        }
    }

    /// Like [`from_env_value`](Self::from_env_value), but an unset
    /// variable yields `fallback`
    pub fn from_env_value_or(value: Option<&str>, fallback: LoggingMode) -> Self {
        match value {
            Some(value) => Self::from_env_value(Some(value)),
            None => fallback,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInit(String),

    #[error("Invalid log filter '{0}'")]
    InvalidFilter(String),
}

/// Initialize logging with the specified mode
///
/// # Environment Variables
///
/// - `DSPLAY_LOG_LEVEL`: filter directive, e.g. `debug` or `dsplay_sdk=trace`
/// - `RUST_LOG`: used when `DSPLAY_LOG_LEVEL` is unset
pub fn init_logging(mode: LoggingMode) -> Result<(), LoggingError> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    match mode {
        LoggingMode::Silent => Ok(()),
        LoggingMode::Development => {
            let filter = create_env_filter("info")?;

            Registry::default()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(false)
                        .compact(),
                )
                .with(filter)
                .try_init()
                .map_err(|e| LoggingError::TracingInit(e.to_string()))
        }
        LoggingMode::Debug => {
            let filter = create_env_filter("debug")?;

            Registry::default()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .pretty()
                        .with_file(true)
                        .with_line_number(true),
                )
                .with(filter)
                .try_init()
                .map_err(|e| LoggingError::TracingInit(e.to_string()))
        }
    }
}

/// Initialize logging from `DSPLAY_LOG_MODE` (`silent`, `development`, `debug`)
///
/// `fallback` applies when the variable is unset.
pub fn init_logging_from_env(fallback: LoggingMode) -> Result<(), LoggingError> {
    let value = std::env::var("DSPLAY_LOG_MODE").ok();
    init_logging(LoggingMode::from_env_value_or(value.as_deref(), fallback))
}

/// `DSPLAY_LOG_LEVEL`, then `RUST_LOG`, then the mode default
fn create_env_filter(default_level: &str) -> Result<EnvFilter, LoggingError> {
    let directive = std::env::var("DSPLAY_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| default_level.to_string());

    EnvFilter::try_new(&directive).map_err(|_| LoggingError::InvalidFilter(directive))
}

/// Whether a global subscriber is already installed
pub fn is_initialized() -> bool {
    tracing::dispatcher::has_been_set()
}
