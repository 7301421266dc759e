//! Playback surfaces exposed by a DiskStation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ApiError;

/// The two independent playback surfaces
///
/// Each mode has its own login session, its own set of renderer devices
/// and its own family of Web APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Audio Station remote players
    Audio,
    /// Video Station playback devices
    Video,
}

impl Mode {
    /// Both modes, in a stable order
    pub const ALL: [Mode; 2] = [Mode::Audio, Mode::Video];

    /// Session name sent with the login call
    pub fn session_name(&self) -> &'static str {
        match self {
            Mode::Audio => "AudioStation",
            Mode::Video => "VideoStation",
        }
    }

    /// URI scheme of library references and play tokens in this mode
    pub fn scheme(&self) -> &'static str {
        match self {
            Mode::Audio => "dsaudio",
            Mode::Video => "dsvideo",
        }
    }

    /// Mode owning a URI scheme
    pub fn from_scheme(scheme: &str) -> Option<Mode> {
        match scheme {
            "dsaudio" => Some(Mode::Audio),
            "dsvideo" => Some(Mode::Video),
            _ => None,
        }
    }

    /// Query parameter that addresses a device in room-scoped calls
    pub fn device_param(&self) -> &'static str {
        match self {
            Mode::Audio => "id",
            Mode::Video => "device_id",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mode::Audio => "audio",
            Mode::Video => "video",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "audio" => Ok(Mode::Audio),
            "video" => Ok(Mode::Video),
            other => Err(ApiError::InvalidParameter(format!(
                "unknown mode '{}', expected 'audio' or 'video'",
                other
            ))),
        }
    }
}
