//! Audio Station operations
//!
//! Remote player control and queue management, player listing and
//! library lookups for songs, albums and artists.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::define_ds_operation;
use crate::operation::{DsOperation, NoContent};

pub const REMOTE_PLAYER_API: &str = "SYNO.AudioStation.RemotePlayer";

/// Transport actions of the remote player `control` method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    Play,
    Pause,
    Stop,
    Next,
    Prev,
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PlayerAction::Play => "play",
            PlayerAction::Pause => "pause",
            PlayerAction::Stop => "stop",
            PlayerAction::Next => "next",
            PlayerAction::Prev => "prev",
        })
    }
}

// =============================================================================
// REMOTE PLAYER
// =============================================================================

define_ds_operation! {
    /// Send a transport action to a remote player
    operation: RemotePlayerControlOperation,
    api: "SYNO.AudioStation.RemotePlayer",
    method: "control",
    version: 2,
    request: {
        id: String => "id",
        action: PlayerAction => "action",
    },
    fixed: {},
    response: NoContent,
}

define_ds_operation! {
    /// List remote players, including sub-players of multi-room setups
    operation: ListRemotePlayersOperation,
    api: "SYNO.AudioStation.RemotePlayer",
    method: "list",
    version: 2,
    request: {},
    fixed: {
        "type" => "all",
        "additional" => "subplayer_list",
    },
    response: RemotePlayerList,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemotePlayerList {
    #[serde(default)]
    pub players: Vec<RemotePlayer>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemotePlayer {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

define_ds_operation! {
    /// Read the queue of a remote player; `limit=0` only reports its length
    operation: GetPlaylistOperation,
    api: "SYNO.AudioStation.RemotePlayer",
    method: "getplaylist",
    version: 2,
    request: {
        id: String => "id",
    },
    fixed: {
        "offset" => "0",
        "limit" => "0",
    },
    response: PlaylistInfo,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaylistInfo {
    #[serde(default)]
    pub total: u32,
}

/// Replace a window of a remote player queue
///
/// Items in `[offset, offset + limit)` are replaced by `songs` (comma
/// separated ids) or by the songs of `containers`. An empty song list
/// over the whole queue truncates it.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdatePlaylistOperation {
    pub id: String,
    pub offset: i64,
    pub limit: u32,
    pub songs: String,
    pub containers: Vec<PlaylistContainer>,
    pub play: bool,
}

impl UpdatePlaylistOperation {
    /// Empty the queue of a player holding `length` items
    pub fn truncate(id: impl Into<String>, length: u32) -> Self {
        Self {
            id: id.into(),
            offset: 0,
            limit: length,
            songs: String::new(),
            containers: Vec::new(),
            play: false,
        }
    }
}

impl DsOperation for UpdatePlaylistOperation {
    type Response = NoContent;

    const API: &'static str = REMOTE_PLAYER_API;
    const METHOD: &'static str = "updateplaylist";
    const VERSION: u32 = 3;

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("library", "shared".to_string()),
            ("id", self.id.clone()),
            ("offset", self.offset.to_string()),
            ("limit", self.limit.to_string()),
            ("songs", self.songs.clone()),
        ];
        if !self.containers.is_empty() {
            // Serializing plain data structs into a Vec cannot fail
            let json = serde_json::to_string(&self.containers).unwrap_or_else(|_| "[]".to_string());
            params.push(("containers_json", json));
        }
        params.push(("play", self.play.to_string()));
        params.push(("updated_index", "-1".to_string()));
        params.push(("keep_shuffle_order", "false".to_string()));
        params
    }
}

/// A library collection enqueued as a whole
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PlaylistContainer {
    Album {
        album: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        album_artist: Option<String>,
        sort_by: String,
        sort_direction: String,
    },
    Artist {
        artist: String,
        sort_by: String,
        sort_direction: String,
    },
}

impl PlaylistContainer {
    /// An album sorted by name, ascending
    pub fn album(name: impl Into<String>, artist: Option<String>) -> Self {
        PlaylistContainer::Album {
            album: name.into(),
            album_artist: artist,
            sort_by: "name".to_string(),
            sort_direction: "ASC".to_string(),
        }
    }

    /// All songs of an artist sorted by name, ascending
    pub fn artist(name: impl Into<String>) -> Self {
        PlaylistContainer::Artist {
            artist: name.into(),
            sort_by: "name".to_string(),
            sort_direction: "ASC".to_string(),
        }
    }
}

// =============================================================================
// LIBRARY
// =============================================================================

define_ds_operation! {
    /// Song metadata with its tags
    operation: SongInfoOperation,
    api: "SYNO.AudioStation.Song",
    method: "getinfo",
    version: 2,
    request: {
        id: String => "id",
    },
    fixed: {
        "library" => "shared",
        "additional" => "song_tag",
    },
    response: SongList,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SongList {
    #[serde(default)]
    pub songs: Vec<Song>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Song {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub additional: SongAdditional,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SongAdditional {
    #[serde(default)]
    pub song_tag: SongTag,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SongTag {
    #[serde(default)]
    pub album: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub album_artist: String,
}

define_ds_operation! {
    /// Search albums by keyword
    operation: ListAlbumsOperation,
    api: "SYNO.AudioStation.Album",
    method: "list",
    version: 2,
    request: {
        keyword: String => "keyword",
    },
    fixed: {
        "library" => "shared",
        "offset" => "0",
        "limit" => "1000",
    },
    response: AlbumList,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumList {
    #[serde(default)]
    pub albums: Vec<Album>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Album {
    pub name: String,
    #[serde(default)]
    pub album_artist: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub display_artist: String,
}

impl Album {
    /// The artist to show and to look covers up with
    pub fn credited_artist(&self) -> Option<&str> {
        [&self.album_artist, &self.display_artist, &self.artist]
            .into_iter()
            .map(String::as_str)
            .find(|a| !a.is_empty())
    }
}

define_ds_operation! {
    /// Search artists by keyword
    operation: ListArtistsOperation,
    api: "SYNO.AudioStation.Artist",
    method: "list",
    version: 4,
    request: {
        keyword: String => "keyword",
    },
    fixed: {
        "library" => "shared",
        "offset" => "0",
        "limit" => "1000",
    },
    response: ArtistList,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistList {
    #[serde(default)]
    pub artists: Vec<Artist>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Artist {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_control_request() {
        let request = RemotePlayerControlOperation {
            id: "uuid:player".to_string(),
            action: PlayerAction::Prev,
        }
        .request();

        assert_eq!(request.api(), REMOTE_PLAYER_API);
        assert_eq!(request.method(), "control");
        assert_eq!(request.get_param("id"), Some("uuid:player"));
        assert_eq!(request.get_param("action"), Some("prev"));
    }

    #[test]
    fn test_truncate_playlist_params() {
        let request = UpdatePlaylistOperation::truncate("uuid:player", 12).request();

        assert_eq!(request.method(), "updateplaylist");
        assert_eq!(request.get_param("offset"), Some("0"));
        assert_eq!(request.get_param("limit"), Some("12"));
        assert_eq!(request.get_param("songs"), Some(""));
        assert!(!request.has_param("containers_json"));
    }

    #[test]
    fn test_container_params() {
        let op = UpdatePlaylistOperation {
            id: "p".to_string(),
            offset: 0,
            limit: 3,
            songs: String::new(),
            containers: vec![PlaylistContainer::album("Foo", Some("Bar".to_string()))],
            play: true,
        };
        let request = op.request();

        assert_eq!(
            request.get_param("containers_json"),
            Some(r#"[{"type":"album","album":"Foo","album_artist":"Bar","sort_by":"name","sort_direction":"ASC"}]"#)
        );
        assert_eq!(request.get_param("play"), Some("true"));
    }

    #[test]
    fn test_artist_container_json() {
        let json = serde_json::to_string(&PlaylistContainer::artist("Bar")).unwrap();
        assert_eq!(json, r#"{"type":"artist","artist":"Bar","sort_by":"name","sort_direction":"ASC"}"#);
    }

    #[test]
    fn test_parse_players() {
        let data = json!({
            "players": [
                {"id": "__SYNO_USB_PLAYER__", "name": "USB Speaker", "type": "usb"},
                {"id": "uuid:0e4e1c00", "name": "Kitchen", "type": "upnp"}
            ]
        });
        let list = ListRemotePlayersOperation::parse_response(Some(data)).unwrap();
        assert_eq!(list.players.len(), 2);
        assert_eq!(list.players[1].name, "Kitchen");
    }

    #[test]
    fn test_parse_song() {
        let data = json!({
            "songs": [{
                "id": "music_42",
                "title": "Song",
                "additional": {"song_tag": {"album": "Foo", "artist": "Bar", "album_artist": "Bar"}}
            }]
        });
        let list = SongInfoOperation::parse_response(Some(data)).unwrap();
        assert_eq!(list.songs[0].additional.song_tag.album, "Foo");
    }

    #[test]
    fn test_album_credited_artist() {
        let album = Album {
            name: "Foo".to_string(),
            album_artist: String::new(),
            artist: "Bar".to_string(),
            display_artist: String::new(),
        };
        assert_eq!(album.credited_artist(), Some("Bar"));
    }
}
