//! Turning library references into something a card can show and play

use dsplay_api::artwork::{cover_request, poster_request, CoverLookup, PosterKind};
use dsplay_api::operations::audio::{Album, ListAlbumsOperation, ListArtistsOperation, SongInfoOperation};
use dsplay_api::operations::video::{EpisodeInfoOperation, MovieInfoOperation};
use dsplay_api::{IdList, Mode, Transport};
use serde::Serialize;
use tracing::debug;

use crate::context::ModeContext;
use crate::gateway::Gateway;
use crate::reference::TrackReference;
use crate::token::{AudioPlayToken, PlayToken, VideoPlayToken};
use crate::{Result, SdkError};

/// A resolved library item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaybackDescriptor {
    pub title: String,
    pub album: Option<String>,
    pub artist: Option<String>,
    /// Link that embeds the session id valid at resolve time
    pub artwork_url: String,
    pub play_token: PlayToken,
}

/// Split a movie title of the form `Title - Subtitle` on its first dash
pub fn split_movie_title(full: &str) -> (String, Option<String>) {
    match full.split_once('-') {
        Some((title, subtitle)) => {
            let subtitle = subtitle.trim();
            (
                title.trim().to_string(),
                (!subtitle.is_empty()).then(|| subtitle.to_string()),
            )
        }
        None => (full.trim().to_string(), None),
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

pub struct TrackResolver<'a, T: Transport> {
    gateway: &'a mut Gateway<T>,
    context: &'a mut ModeContext,
}

impl<'a, T: Transport> TrackResolver<'a, T> {
    pub fn new(gateway: &'a mut Gateway<T>, context: &'a mut ModeContext) -> Self {
        Self { gateway, context }
    }

    /// Parse and resolve a library reference
    pub fn resolve(&mut self, uri: &str) -> Result<PlaybackDescriptor> {
        let reference: TrackReference = uri.parse()?;
        self.resolve_reference(&reference)
    }

    /// Resolve a parsed reference, switching to the mode it belongs to
    pub fn resolve_reference(&mut self, reference: &TrackReference) -> Result<PlaybackDescriptor> {
        self.context.switch_mode(reference.mode());
        debug!(reference = %reference, "resolving");

        match reference {
            TrackReference::Episode { episode_id, show_id } => self.episode(episode_id, show_id),
            TrackReference::Movie { movie_id } => self.movie(movie_id),
            TrackReference::Song { song_id } => self.song(song_id),
            TrackReference::Album { name, artist_hint } => self.album(name, artist_hint.as_deref()),
            TrackReference::Artist { name } => self.artist(name),
        }
    }

    fn episode(&mut self, episode_id: &str, show_id: &str) -> Result<PlaybackDescriptor> {
        let info = self.gateway.execute(
            Mode::Video,
            &EpisodeInfoOperation {
                tvshow_id: show_id.to_string(),
                ids: IdList::single(episode_id),
            },
        )?;
        let episode = info
            .episode
            .into_iter()
            .next()
            .ok_or_else(|| SdkError::NotFound(format!("episode {} of show {}", episode_id, show_id)))?;
        let file = episode
            .additional
            .file
            .first()
            .ok_or_else(|| SdkError::NotFound(format!("file of episode {}", episode_id)))?;

        let artwork_url = self
            .gateway
            .signed_url(Mode::Video, |sid| poster_request(PosterKind::TvShow, show_id, sid))?;

        Ok(PlaybackDescriptor {
            title: episode.tagline.clone(),
            album: non_empty(&episode.title),
            artist: None,
            artwork_url,
            play_token: PlayToken::Video(VideoPlayToken::file(file.id)),
        })
    }

    fn movie(&mut self, movie_id: &str) -> Result<PlaybackDescriptor> {
        let info = self.gateway.execute(
            Mode::Video,
            &MovieInfoOperation {
                ids: IdList::single(movie_id),
            },
        )?;
        let movie = info
            .movie
            .into_iter()
            .next()
            .ok_or_else(|| SdkError::NotFound(format!("movie {}", movie_id)))?;
        let file = movie
            .additional
            .file
            .first()
            .ok_or_else(|| SdkError::NotFound(format!("file of movie {}", movie_id)))?;

        let artwork_url = self
            .gateway
            .signed_url(Mode::Video, |sid| poster_request(PosterKind::Movie, movie_id, sid))?;
        let (title, album) = split_movie_title(&movie.title);

        Ok(PlaybackDescriptor {
            title,
            album,
            artist: None,
            artwork_url,
            play_token: PlayToken::Video(VideoPlayToken::file(file.id)),
        })
    }

    fn song(&mut self, song_id: &str) -> Result<PlaybackDescriptor> {
        let list = self.gateway.execute(
            Mode::Audio,
            &SongInfoOperation {
                id: song_id.to_string(),
            },
        )?;
        let song = list
            .songs
            .into_iter()
            .next()
            .ok_or_else(|| SdkError::NotFound(format!("song {}", song_id)))?;
        let tag = &song.additional.song_tag;

        let album_artist = if tag.album_artist.is_empty() {
            tag.artist.as_str()
        } else {
            tag.album_artist.as_str()
        };
        let lookup = if tag.album.is_empty() && !tag.artist.is_empty() {
            CoverLookup::Artist { name: &tag.artist }
        } else {
            CoverLookup::Album {
                name: &tag.album,
                artist: Some(album_artist),
            }
        };
        let artwork_url = self.gateway.signed_url(Mode::Audio, |sid| cover_request(lookup, sid))?;

        Ok(PlaybackDescriptor {
            title: song.title.clone(),
            album: non_empty(&tag.album),
            artist: non_empty(&tag.artist),
            artwork_url,
            play_token: PlayToken::Audio(AudioPlayToken::song(song.id.clone())),
        })
    }

    fn album(&mut self, name: &str, artist_hint: Option<&str>) -> Result<PlaybackDescriptor> {
        let list = self.gateway.execute(
            Mode::Audio,
            &ListAlbumsOperation {
                keyword: name.to_string(),
            },
        )?;
        let album = pick_album(list.albums, name, artist_hint)
            .ok_or_else(|| SdkError::NotFound(format!("album '{}'", name)))?;

        let artist = album
            .credited_artist()
            .map(str::to_string)
            .or_else(|| artist_hint.map(str::to_string));
        let lookup = CoverLookup::Album {
            name: &album.name,
            artist: artist.as_deref(),
        };
        let artwork_url = self.gateway.signed_url(Mode::Audio, |sid| cover_request(lookup, sid))?;
        let queue_artist = non_empty(&album.album_artist).or_else(|| artist_hint.map(str::to_string));

        Ok(PlaybackDescriptor {
            title: album.name.clone(),
            album: Some(album.name.clone()),
            artist,
            artwork_url,
            play_token: PlayToken::Audio(AudioPlayToken::album(album.name, queue_artist)),
        })
    }

    fn artist(&mut self, name: &str) -> Result<PlaybackDescriptor> {
        let list = self.gateway.execute(
            Mode::Audio,
            &ListArtistsOperation {
                keyword: name.to_string(),
            },
        )?;
        let artist = list
            .artists
            .into_iter()
            .find(|a| a.name.to_lowercase() == name.to_lowercase())
            .ok_or_else(|| SdkError::NotFound(format!("artist '{}'", name)))?;

        let artwork_url = self
            .gateway
            .signed_url(Mode::Audio, |sid| cover_request(CoverLookup::Artist { name: &artist.name }, sid))?;

        Ok(PlaybackDescriptor {
            title: artist.name.clone(),
            album: None,
            artist: Some(artist.name.clone()),
            artwork_url,
            play_token: PlayToken::Audio(AudioPlayToken::artist(artist.name)),
        })
    }
}

/// First album whose name matches case-insensitively, preferring one whose
/// artist also matches the hint
fn pick_album(albums: Vec<Album>, name: &str, artist_hint: Option<&str>) -> Option<Album> {
    let name = name.to_lowercase();
    let mut matches = albums.into_iter().filter(|a| a.name.to_lowercase() == name);
    let first = matches.next()?;

    let Some(hint) = artist_hint.map(str::to_lowercase) else {
        return Some(first);
    };
    let credited = |a: &Album| {
        [&a.album_artist, &a.artist, &a.display_artist]
            .iter()
            .any(|artist| artist.to_lowercase() == hint)
    };
    if credited(&first) {
        return Some(first);
    }
    Some(matches.find(|a| credited(a)).unwrap_or(first))
}
