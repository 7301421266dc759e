use dsplay_api::{DsRequest, Mode};
use serde_json::Value;
use tracing::info;

use crate::controller::{CommandCapable, ResolveCapable};
use crate::dispatcher::{Command, CommandOutcome};
use crate::reference::TrackReference;
use crate::resolver::PlaybackDescriptor;
use crate::token::{AudioPlayToken, PlayToken, VideoPlayToken};
use crate::Result;

/// Controller that only logs, for dry runs
///
/// Every call is recorded so a host can be exercised without a server.
#[derive(Debug)]
pub struct DummyController {
    mode: Mode,
    room: Option<String>,
    calls: Vec<String>,
}

impl DummyController {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            room: None,
            calls: Vec::new(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn room(&self) -> Option<&str> {
        self.room.as_deref()
    }

    /// Calls received so far, one line each
    pub fn calls(&self) -> &[String] {
        &self.calls
    }

    fn record(&mut self, call: String) {
        info!(target: "dsplay_sdk::dummy", "{}", call);
        self.calls.push(call);
    }
}

impl Default for DummyController {
    fn default() -> Self {
        Self::new(Mode::Video)
    }
}

impl CommandCapable for DummyController {
    fn switch_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.record(format!("switch_mode {}", mode));
    }

    fn switch_room(&mut self, name: &str, mode: Option<Mode>) -> Result<bool> {
        if let Some(mode) = mode {
            self.mode = mode;
        }
        self.room = Some(name.to_string());
        self.record(format!("switch_room {} ({})", name, self.mode));
        Ok(true)
    }

    fn handle_command(&mut self, command: &str) -> Result<Option<String>> {
        self.record(format!("command {}", command));
        Ok(match Command::parse(command) {
            Some(_) => None,
            None => CommandOutcome::NotRecognized(command.to_string()).user_message(),
        })
    }

    fn perform_global_request(&mut self, request: DsRequest) -> Result<Option<Value>> {
        self.record(format!("global {}.{}", request.api(), request.method()));
        Ok(None)
    }

    fn perform_room_request(&mut self, request: DsRequest) -> Result<Option<Value>> {
        let room = self.room.clone().unwrap_or_default();
        self.record(format!("room {} {}.{}", room, request.api(), request.method()));
        Ok(None)
    }

    fn play(&mut self, token: &PlayToken) -> Result<()> {
        self.mode = token.mode();
        self.record(format!("play {}", token));
        Ok(())
    }
}

impl ResolveCapable for DummyController {
    /// Parses the reference and returns a placeholder descriptor
    fn resolve_track(&mut self, uri: &str) -> Result<PlaybackDescriptor> {
        let reference: TrackReference = uri.parse()?;
        self.record(format!("resolve {}", reference));

        let (title, play_token) = match &reference {
            TrackReference::Episode { episode_id, .. } => {
                (episode_id.clone(), PlayToken::Video(VideoPlayToken::file(0)))
            }
            TrackReference::Movie { movie_id } => (movie_id.clone(), PlayToken::Video(VideoPlayToken::file(0))),
            TrackReference::Song { song_id } => {
                (song_id.clone(), PlayToken::Audio(AudioPlayToken::song(song_id.clone())))
            }
            TrackReference::Album { name, artist_hint } => (
                name.clone(),
                PlayToken::Audio(AudioPlayToken::album(name.clone(), artist_hint.clone())),
            ),
            TrackReference::Artist { name } => (name.clone(), PlayToken::Audio(AudioPlayToken::artist(name.clone()))),
        };

        Ok(PlaybackDescriptor {
            title,
            album: None,
            artist: None,
            artwork_url: String::new(),
            play_token,
        })
    }
}
