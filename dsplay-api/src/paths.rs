//! Lookup table from logical API name to HTTP path
//!
//! The table has the shape of the server's own `SYNO.API.Info` answer:
//!
//! ```json
//! {"data": {"SYNO.API.Auth": {"path": "auth.cgi", "minVersion": 1, "maxVersion": 6}}}
//! ```
//!
//! It can be read from a file, fetched from the server (see
//! [`DsClient::fetch_path_table`](crate::DsClient::fetch_path_table)) or
//! taken from the built-in defaults covering the APIs this crate uses.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

use crate::{ApiError, Result};

/// Path and supported version range of one API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiInfo {
    /// Path relative to the `webapi` base URL (e.g. `entry.cgi`)
    pub path: String,
    #[serde(rename = "minVersion", default)]
    pub min_version: u32,
    #[serde(rename = "maxVersion", default)]
    pub max_version: u32,
}

/// Logical API name to path mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiPathTable {
    apis: HashMap<String, ApiInfo>,
}

#[derive(Deserialize)]
struct Wrapped {
    data: HashMap<String, ApiInfo>,
}

/// Built-in paths for every API used by the operations in this crate
const BUILTIN: &[(&str, &str, u32, u32)] = &[
    ("SYNO.API.Info", "query.cgi", 1, 1),
    ("SYNO.API.Auth", "auth.cgi", 1, 6),
    ("SYNO.VideoStation2.Controller.Playback", "entry.cgi", 1, 2),
    ("SYNO.VideoStation2.Controller.Device", "entry.cgi", 1, 1),
    ("SYNO.VideoStation2.TVShowEpisode", "entry.cgi", 1, 1),
    ("SYNO.VideoStation2.Movie", "entry.cgi", 1, 1),
    ("SYNO.VideoStation2.Poster", "entry.cgi", 1, 1),
    ("SYNO.AudioStation.RemotePlayer", "AudioStation/remote_player.cgi", 1, 3),
    ("SYNO.AudioStation.Song", "AudioStation/song.cgi", 1, 3),
    ("SYNO.AudioStation.Album", "AudioStation/album.cgi", 1, 3),
    ("SYNO.AudioStation.Artist", "AudioStation/artist.cgi", 1, 4),
    ("SYNO.AudioStation.Cover", "AudioStation/cover.cgi", 1, 3),
];

impl ApiPathTable {
    /// An empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with the built-in defaults
    pub fn builtin() -> Self {
        let apis = BUILTIN
            .iter()
            .map(|(name, path, min, max)| {
                (
                    name.to_string(),
                    ApiInfo {
                        path: path.to_string(),
                        min_version: *min,
                        max_version: *max,
                    },
                )
            })
            .collect();
        Self { apis }
    }

    /// Parse a table from JSON, with or without the `data` wrapper
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| ApiError::PathTable(e.to_string()))?;
        Self::from_value(value)
    }

    /// Build a table from the payload of an info query
    pub fn from_value(value: Value) -> Result<Self> {
        let apis = if value.get("data").is_some() {
            serde_json::from_value::<Wrapped>(value).map(|w| w.data)
        } else {
            serde_json::from_value::<HashMap<String, ApiInfo>>(value)
        }
        .map_err(|e| ApiError::PathTable(e.to_string()))?;

        Ok(Self { apis })
    }

    /// Load a table from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| ApiError::PathTable(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// HTTP path of an API
    pub fn path_for(&self, api: &str) -> Option<&str> {
        self.apis.get(api).map(|info| info.path.as_str())
    }

    pub fn info(&self, api: &str) -> Option<&ApiInfo> {
        self.apis.get(api)
    }

    pub fn insert(&mut self, api: impl Into<String>, info: ApiInfo) {
        self.apis.insert(api.into(), info);
    }

    /// Add entries of `other` that this table lacks
    pub fn fill_from(&mut self, other: &ApiPathTable) {
        for (name, info) in &other.apis {
            self.apis
                .entry(name.clone())
                .or_insert_with(|| info.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.apis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apis.is_empty()
    }
}
