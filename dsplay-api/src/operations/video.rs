//! Video Station operations
//!
//! Playback control on a renderer device, device listing and library
//! metadata for movies and TV show episodes.

use serde::Deserialize;

use crate::define_ds_operation;
use crate::operation::NoContent;
use crate::request::IdList;

pub const PLAYBACK_API: &str = "SYNO.VideoStation2.Controller.Playback";

// =============================================================================
// PLAYBACK CONTROL
// =============================================================================

define_ds_operation! {
    /// Start playing a library file on a device
    operation: PlayFileOperation,
    api: "SYNO.VideoStation2.Controller.Playback",
    method: "play",
    version: 2,
    request: {
        device_id: String => "device_id",
        file_id: u64 => "file_id",
    },
    fixed: {
        "playback_target" => "file_id",
    },
    response: NoContent,
}

define_ds_operation! {
    /// Resume a paused renderer
    operation: ResumePlaybackOperation,
    api: "SYNO.VideoStation2.Controller.Playback",
    method: "resume",
    version: 2,
    request: {
        device_id: String => "device_id",
    },
    fixed: {},
    response: NoContent,
}

define_ds_operation! {
    operation: PausePlaybackOperation,
    api: "SYNO.VideoStation2.Controller.Playback",
    method: "pause",
    version: 2,
    request: {
        device_id: String => "device_id",
    },
    fixed: {},
    response: NoContent,
}

define_ds_operation! {
    operation: StopPlaybackOperation,
    api: "SYNO.VideoStation2.Controller.Playback",
    method: "stop",
    version: 2,
    request: {
        device_id: String => "device_id",
    },
    fixed: {},
    response: NoContent,
}

define_ds_operation! {
    /// Skip to the next item on a device
    operation: NextPlaybackOperation,
    api: "SYNO.VideoStation2.Controller.Playback",
    method: "next",
    version: 2,
    request: {
        device_id: String => "device_id",
    },
    fixed: {},
    response: NoContent,
}

define_ds_operation! {
    operation: PreviousPlaybackOperation,
    api: "SYNO.VideoStation2.Controller.Playback",
    method: "prev",
    version: 2,
    request: {
        device_id: String => "device_id",
    },
    fixed: {},
    response: NoContent,
}

// =============================================================================
// DEVICES
// =============================================================================

define_ds_operation! {
    /// List renderer devices known to Video Station
    operation: ListVideoDevicesOperation,
    api: "SYNO.VideoStation2.Controller.Device",
    method: "list",
    version: 1,
    request: {},
    fixed: {},
    response: VideoDeviceList,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoDeviceList {
    #[serde(default)]
    pub device: Vec<VideoDevice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoDevice {
    pub id: String,
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

// =============================================================================
// LIBRARY
// =============================================================================

/// File attached to a library item
#[derive(Debug, Clone, Deserialize)]
pub struct FileRef {
    pub id: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Additional {
    #[serde(default)]
    pub file: Vec<FileRef>,
}

define_ds_operation! {
    /// Episode metadata including its files
    operation: EpisodeInfoOperation,
    api: "SYNO.VideoStation2.TVShowEpisode",
    method: "getinfo",
    version: 1,
    request: {
        tvshow_id: String => "tvshow_id",
        ids: IdList => "id",
    },
    fixed: {
        "additional" => "[\"file\"]",
        "library_id" => "0",
    },
    response: EpisodeInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EpisodeInfo {
    #[serde(default)]
    pub episode: Vec<Episode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Episode {
    /// Title of the show
    #[serde(default)]
    pub title: String,
    /// Title of the episode itself
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub additional: Additional,
}

define_ds_operation! {
    /// Movie metadata including its files
    operation: MovieInfoOperation,
    api: "SYNO.VideoStation2.Movie",
    method: "getinfo",
    version: 1,
    request: {
        ids: IdList => "id",
    },
    fixed: {
        "additional" => "[\"file\",\"extra\"]",
    },
    response: MovieInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MovieInfo {
    #[serde(default)]
    pub movie: Vec<Movie>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Movie {
    pub title: String,
    #[serde(default)]
    pub additional: Additional,
}
