//! Artwork links
//!
//! Posters and covers are served by the Web API itself, so an artwork
//! link is a complete request URL carrying the session id. These builders
//! produce the requests; [`Transport::url_for`](crate::Transport::url_for)
//! turns them into URLs.

use crate::request::{DsRequest, SID_PARAM};

pub const POSTER_API: &str = "SYNO.VideoStation2.Poster";
pub const COVER_API: &str = "SYNO.AudioStation.Cover";

/// Library item a poster belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosterKind {
    Movie,
    TvShow,
}

impl PosterKind {
    fn as_str(&self) -> &'static str {
        match self {
            PosterKind::Movie => "movie",
            PosterKind::TvShow => "tvshow",
        }
    }
}

/// Poster of a movie or TV show
pub fn poster_request(kind: PosterKind, id: &str, sid: &str) -> DsRequest {
    DsRequest::new(POSTER_API, "get", 1)
        .param("type", kind.as_str())
        .param("id", id)
        .param("resolution", "\"2x\"")
        .param(SID_PARAM, sid)
}

/// What a cover is looked up by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverLookup<'a> {
    Album {
        name: &'a str,
        artist: Option<&'a str>,
    },
    Artist {
        name: &'a str,
    },
}

/// Cover of an album or artist
pub fn cover_request(lookup: CoverLookup<'_>, sid: &str) -> DsRequest {
    let request = DsRequest::new(COVER_API, "getcover", 3).param("library", "shared");
    let request = match lookup {
        CoverLookup::Album { name, artist } => {
            let request = request.param("album_name", name);
            match artist {
                Some(artist) if !artist.is_empty() => request.param("album_artist_name", artist),
                _ => request,
            }
        }
        CoverLookup::Artist { name } => request.param("artist_name", name),
    };
    request.param(SID_PARAM, sid)
}
