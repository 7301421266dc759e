//! Library references
//!
//! A library reference names a playable item the way a card prints it:
//! `<scheme>:<key>=<value>|<key>=<value>...` with scheme `dsvideo` or
//! `dsaudio`. The set of keys decides what the reference points at.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use dsplay_api::Mode;

use crate::SdkError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackReference {
    Episode { episode_id: String, show_id: String },
    Movie { movie_id: String },
    Song { song_id: String },
    Album { name: String, artist_hint: Option<String> },
    Artist { name: String },
}

impl TrackReference {
    /// Mode the referenced item plays in
    pub fn mode(&self) -> Mode {
        match self {
            TrackReference::Episode { .. } | TrackReference::Movie { .. } => Mode::Video,
            TrackReference::Song { .. } | TrackReference::Album { .. } | TrackReference::Artist { .. } => {
                Mode::Audio
            }
        }
    }

    fn from_fields(mode: Mode, mut fields: BTreeMap<String, String>) -> Option<TrackReference> {
        let keys: Vec<String> = fields.keys().cloned().collect();
        let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
        let reference = match (mode, keys.as_slice()) {
            (Mode::Video, ["tvshow_id", "tvshowepisode_id"]) => TrackReference::Episode {
                episode_id: fields.remove("tvshowepisode_id")?,
                show_id: fields.remove("tvshow_id")?,
            },
            (Mode::Video, ["movie_id"]) => TrackReference::Movie {
                movie_id: fields.remove("movie_id")?,
            },
            (Mode::Audio, ["song"]) => TrackReference::Song {
                song_id: fields.remove("song")?,
            },
            (Mode::Audio, ["album"]) | (Mode::Audio, ["album", "album_artist"]) => {
                TrackReference::Album {
                    name: fields.remove("album")?,
                    artist_hint: fields.remove("album_artist"),
                }
            }
            (Mode::Audio, ["artist"]) => TrackReference::Artist {
                name: fields.remove("artist")?,
            },
            _ => return None,
        };
        Some(reference)
    }
}

impl FromStr for TrackReference {
    type Err = SdkError;

    fn from_str(uri: &str) -> Result<Self, Self::Err> {
        let uri = uri.trim();
        let (scheme, body) = uri
            .split_once(':')
            .ok_or_else(|| SdkError::Parse(format!("missing scheme in '{}'", uri)))?;
        let mode = Mode::from_scheme(scheme)
            .ok_or_else(|| SdkError::Parse(format!("unsupported scheme '{}'", scheme)))?;

        let mut fields = BTreeMap::new();
        for segment in body.split('|') {
            let (key, value) = segment
                .split_once('=')
                .ok_or_else(|| SdkError::Parse(format!("malformed segment '{}' in '{}'", segment, uri)))?;
            if key.is_empty() || value.is_empty() {
                return Err(SdkError::Parse(format!("empty key or value in '{}'", uri)));
            }
            if fields.insert(key.to_string(), value.to_string()).is_some() {
                return Err(SdkError::Parse(format!("duplicate key '{}' in '{}'", key, uri)));
            }
        }

        TrackReference::from_fields(mode, fields)
            .ok_or_else(|| SdkError::Parse(format!("unrecognized key combination in '{}'", uri)))
    }
}

impl fmt::Display for TrackReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackReference::Episode { episode_id, show_id } => {
                write!(f, "dsvideo:tvshow_id={}|tvshowepisode_id={}", show_id, episode_id)
            }
            TrackReference::Movie { movie_id } => write!(f, "dsvideo:movie_id={}", movie_id),
            TrackReference::Song { song_id } => write!(f, "dsaudio:song={}", song_id),
            TrackReference::Album { name, artist_hint } => {
                write!(f, "dsaudio:album={}", name)?;
                if let Some(artist) = artist_hint {
                    write!(f, "|album_artist={}", artist)?;
                }
                Ok(())
            }
            TrackReference::Artist { name } => write!(f, "dsaudio:artist={}", name),
        }
    }
}
