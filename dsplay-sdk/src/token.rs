//! Play tokens
//!
//! A play token is what a resolved card stores to start playback later:
//! the mode scheme followed by a JSON object, e.g.
//! `dsvideo:{"api":"SYNO.VideoStation2.Controller.Playback","method":"play","file_id":55,"playback_target":"file_id","version":2}`
//! or `dsaudio:{"type":"song","id":"music_1"}`.

use std::fmt;
use std::str::FromStr;

use dsplay_api::operations::audio::PlaylistContainer;
use dsplay_api::operations::video::PLAYBACK_API;
use dsplay_api::Mode;
use serde::{Deserialize, Serialize, Serializer};

use crate::SdkError;

/// Video Station `play` call, minus the device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoPlayToken {
    pub api: String,
    pub method: String,
    pub file_id: u64,
    pub playback_target: String,
    pub version: u32,
}

impl VideoPlayToken {
    pub fn file(file_id: u64) -> Self {
        Self {
            api: PLAYBACK_API.to_string(),
            method: "play".to_string(),
            file_id,
            playback_target: "file_id".to_string(),
            version: 2,
        }
    }
}

/// What to put in the Audio Station queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AudioPlayToken {
    Song {
        id: String,
    },
    Album {
        album: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        album_artist: Option<String>,
        #[serde(default = "default_sort_by")]
        sort_by: String,
        #[serde(default = "default_sort_direction")]
        sort_direction: String,
    },
    Artist {
        artist: String,
        #[serde(default = "default_sort_by")]
        sort_by: String,
        #[serde(default = "default_sort_direction")]
        sort_direction: String,
    },
}

fn default_sort_by() -> String {
    "name".to_string()
}

fn default_sort_direction() -> String {
    "ASC".to_string()
}

impl AudioPlayToken {
    pub fn song(id: impl Into<String>) -> Self {
        AudioPlayToken::Song { id: id.into() }
    }

    pub fn album(name: impl Into<String>, artist: Option<String>) -> Self {
        AudioPlayToken::Album {
            album: name.into(),
            album_artist: artist,
            sort_by: default_sort_by(),
            sort_direction: default_sort_direction(),
        }
    }

    pub fn artist(name: impl Into<String>) -> Self {
        AudioPlayToken::Artist {
            artist: name.into(),
            sort_by: default_sort_by(),
            sort_direction: default_sort_direction(),
        }
    }

    /// Queue container for collection tokens; songs are queued by id
    pub fn container(&self) -> Option<PlaylistContainer> {
        match self {
            AudioPlayToken::Song { .. } => None,
            AudioPlayToken::Album {
                album,
                album_artist,
                sort_by,
                sort_direction,
            } => Some(PlaylistContainer::Album {
                album: album.clone(),
                album_artist: album_artist.clone(),
                sort_by: sort_by.clone(),
                sort_direction: sort_direction.clone(),
            }),
            AudioPlayToken::Artist {
                artist,
                sort_by,
                sort_direction,
            } => Some(PlaylistContainer::Artist {
                artist: artist.clone(),
                sort_by: sort_by.clone(),
                sort_direction: sort_direction.clone(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayToken {
    Video(VideoPlayToken),
    Audio(AudioPlayToken),
}

impl PlayToken {
    pub fn mode(&self) -> Mode {
        match self {
            PlayToken::Video(_) => Mode::Video,
            PlayToken::Audio(_) => Mode::Audio,
        }
    }

    /// Whether a scanned code looks like a play token rather than a
    /// library reference
    pub fn is_token(code: &str) -> bool {
        code.split_once(':')
            .map(|(scheme, body)| Mode::from_scheme(scheme).is_some() && body.trim_start().starts_with('{'))
            .unwrap_or(false)
    }
}

impl fmt::Display for PlayToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = match self {
            PlayToken::Video(token) => serde_json::to_string(token),
            PlayToken::Audio(token) => serde_json::to_string(token),
        }
        .map_err(|_| fmt::Error)?;
        write!(f, "{}:{}", self.mode().scheme(), body)
    }
}

impl FromStr for PlayToken {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (scheme, body) = s
            .split_once(':')
            .ok_or_else(|| SdkError::Parse(format!("missing scheme in token '{}'", s)))?;
        if !body.trim_start().starts_with('{') {
            return Err(SdkError::Parse(format!("token body is not an object: '{}'", s)));
        }

        let invalid = |e: serde_json::Error| SdkError::Parse(format!("invalid play token '{}': {}", s, e));
        match Mode::from_scheme(scheme) {
            Some(Mode::Video) => {
                let token: VideoPlayToken = serde_json::from_str(body).map_err(invalid)?;
                if token.api != PLAYBACK_API || token.method != "play" {
                    return Err(SdkError::Parse(format!(
                        "unsupported video call {}.{} in token",
                        token.api, token.method
                    )));
                }
                Ok(PlayToken::Video(token))
            }
            Some(Mode::Audio) => Ok(PlayToken::Audio(serde_json::from_str(body).map_err(invalid)?)),
            None => Err(SdkError::Parse(format!("unsupported scheme '{}'", scheme))),
        }
    }
}

impl Serialize for PlayToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
