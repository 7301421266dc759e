//! DiskStation playback controller
//!
//! The controller owns one [`Gateway`] (transport plus both sessions) and
//! one [`ModeContext`] (active mode plus both device registries), and
//! exposes them to the host through [`CommandCapable`] and
//! [`ResolveCapable`].

use dsplay_api::operations::audio::{GetPlaylistOperation, UpdatePlaylistOperation};
use dsplay_api::operations::video::PlayFileOperation;
use dsplay_api::{ApiPathTable, DsClient, DsRequest, Mode, Transport};
use serde_json::Value;
use tracing::{info, warn};

use crate::config::ControllerConfig;
use crate::context::ModeContext;
use crate::dispatcher::CommandDispatcher;
use crate::gateway::Gateway;
use crate::registry::Device;
use crate::resolver::{PlaybackDescriptor, TrackResolver};
use crate::session::Credentials;
use crate::token::{AudioPlayToken, PlayToken};
use crate::Result;

/// What a scanning host drives
pub trait CommandCapable {
    /// Change the active mode; no I/O
    fn switch_mode(&mut self, mode: Mode);

    /// Make a room the default device, optionally switching mode first
    ///
    /// Returns whether the room was found. An unknown room is not an
    /// error; the previous default stays.
    fn switch_room(&mut self, name: &str, mode: Option<Mode>) -> Result<bool>;

    /// Run a command word, returning a message for the user if there is one
    fn handle_command(&mut self, command: &str) -> Result<Option<String>>;

    /// Send a request under the active mode's session, not tied to a device
    fn perform_global_request(&mut self, request: DsRequest) -> Result<Option<Value>>;

    /// Send a request addressed at the active mode's default device
    fn perform_room_request(&mut self, request: DsRequest) -> Result<Option<Value>>;

    /// Start playback of a play token on the default device of its mode
    fn play(&mut self, token: &PlayToken) -> Result<()>;

    /// Warm up library caches before the first scan
    fn load_library_if_needed(&mut self) -> Result<()> {
        Ok(())
    }
}

/// What a card generator drives
pub trait ResolveCapable {
    fn resolve_track(&mut self, uri: &str) -> Result<PlaybackDescriptor>;
}

pub struct DiskstationController<T: Transport = DsClient> {
    gateway: Gateway<T>,
    context: ModeContext,
    audio_room: Option<String>,
    video_room: Option<String>,
}

impl DiskstationController<DsClient> {
    /// Build a controller talking HTTP to the configured DiskStation
    ///
    /// Does not touch the network unless `discover_api_paths` is set;
    /// call [`sync_devices`](Self::sync_devices) to load the rooms.
    pub fn from_config(config: &ControllerConfig) -> Result<Self> {
        let builtin = ApiPathTable::builtin();
        let mut client = DsClient::with_timeouts(config.base_url.clone(), builtin.clone(), config.timeouts());

        let mut paths = match &config.api_paths {
            Some(path) => ApiPathTable::load(path)?,
            None if config.discover_api_paths => match client.fetch_path_table() {
                Ok(table) => table,
                Err(e) => {
                    warn!(error = %e, "could not fetch API path table, using built-in table");
                    builtin.clone()
                }
            },
            None => builtin.clone(),
        };
        paths.fill_from(&builtin);
        client.set_paths(paths);

        let mut controller = Self::new(client, config.credentials(), config.initial_mode);
        controller.audio_room = config.audio_device.clone();
        controller.video_room = config.video_device.clone();
        Ok(controller)
    }
}

impl<T: Transport> DiskstationController<T> {
    pub fn new(transport: T, credentials: Credentials, initial_mode: Mode) -> Self {
        Self {
            gateway: Gateway::new(transport, credentials),
            context: ModeContext::new(initial_mode),
            audio_room: None,
            video_room: None,
        }
    }

    /// Room to select in `mode` when devices are synced
    pub fn with_preferred_room(mut self, mode: Mode, name: impl Into<String>) -> Self {
        let name = Some(name.into());
        match mode {
            Mode::Audio => self.audio_room = name,
            Mode::Video => self.video_room = name,
        }
        self
    }

    fn preferred_room(&self, mode: Mode) -> Option<&str> {
        match mode {
            Mode::Audio => self.audio_room.as_deref(),
            Mode::Video => self.video_room.as_deref(),
        }
    }

    pub fn current_mode(&self) -> Mode {
        self.context.current_mode()
    }

    pub fn gateway(&self) -> &Gateway<T> {
        &self.gateway
    }

    pub fn context(&self) -> &ModeContext {
        &self.context
    }

    /// Refresh both registries and select the preferred room of each
    ///
    /// A failing mode is logged and skipped; the error of the last
    /// failing mode is returned only when both fail.
    pub fn sync_devices(&mut self) -> Result<()> {
        let mut failures = Vec::new();
        for mode in Mode::ALL {
            if let Err(e) = self.sync_mode(mode) {
                warn!(mode = %mode, error = %e, "device sync failed");
                failures.push(e);
            }
        }

        match failures.pop() {
            Some(e) if failures.len() + 1 == Mode::ALL.len() => Err(e),
            _ => Ok(()),
        }
    }

    fn sync_mode(&mut self, mode: Mode) -> Result<()> {
        let preferred = self.preferred_room(mode).map(str::to_string);
        let registry = self.context.registry_mut(mode);
        registry.refresh(&mut self.gateway)?;
        registry.set_default(preferred.as_deref())?;
        Ok(())
    }

    /// Reload the device list of a mode
    pub fn refresh_devices(&mut self, mode: Mode) -> Result<()> {
        self.context.registry_mut(mode).refresh(&mut self.gateway)
    }

    /// Known devices of a mode, in name order
    pub fn devices(&self, mode: Mode) -> Vec<Device> {
        self.context.registry(mode).devices().cloned().collect()
    }

    /// Default device of a mode, if one is selected and known
    pub fn default_device(&self, mode: Mode) -> Option<&Device> {
        self.context.registry(mode).default_device()
    }

    pub fn dispatcher(&mut self) -> CommandDispatcher<'_, T> {
        CommandDispatcher::new(&mut self.gateway, &mut self.context)
    }

    pub fn resolver(&mut self) -> TrackResolver<'_, T> {
        TrackResolver::new(&mut self.gateway, &mut self.context)
    }

    fn current_device(&mut self, mode: Mode) -> Result<String> {
        self.context.registry_mut(mode).current_device(&mut self.gateway)
    }

    fn play_audio(&mut self, token: &AudioPlayToken) -> Result<()> {
        let mode = Mode::Audio;
        let id = self.current_device(mode)?;
        let length = self
            .gateway
            .execute(mode, &GetPlaylistOperation { id: id.clone() })?
            .total;

        let (songs, containers) = match token {
            AudioPlayToken::Song { id } => (id.clone(), Vec::new()),
            other => (String::new(), other.container().into_iter().collect()),
        };
        let update = UpdatePlaylistOperation {
            id,
            offset: 0,
            limit: length,
            songs,
            containers,
            play: true,
        };
        self.gateway.execute(mode, &update)?;
        Ok(())
    }
}

impl<T: Transport> CommandCapable for DiskstationController<T> {
    fn switch_mode(&mut self, mode: Mode) {
        self.context.switch_mode(mode);
    }

    fn switch_room(&mut self, name: &str, mode: Option<Mode>) -> Result<bool> {
        let target = mode.unwrap_or_else(|| self.context.current_mode());
        if self.context.registry(target).is_empty() {
            self.refresh_devices(target)?;
        }
        Ok(self.context.switch_room(name, mode))
    }

    fn handle_command(&mut self, command: &str) -> Result<Option<String>> {
        Ok(self.dispatcher().dispatch(command)?.user_message())
    }

    fn perform_global_request(&mut self, request: DsRequest) -> Result<Option<Value>> {
        let mode = self.context.current_mode();
        self.gateway.perform(mode, request)
    }

    fn perform_room_request(&mut self, mut request: DsRequest) -> Result<Option<Value>> {
        let mode = self.context.current_mode();
        let device_id = self.current_device(mode)?;
        request.set_param(mode.device_param(), device_id);
        self.gateway.perform(mode, request)
    }

    fn play(&mut self, token: &PlayToken) -> Result<()> {
        self.context.switch_mode(token.mode());
        match token {
            PlayToken::Video(video) => {
                let device_id = self.current_device(Mode::Video)?;
                self.gateway.execute(
                    Mode::Video,
                    &PlayFileOperation {
                        device_id,
                        file_id: video.file_id,
                    },
                )?;
            }
            PlayToken::Audio(audio) => self.play_audio(audio)?,
        }
        info!(mode = %token.mode(), "playback started");
        Ok(())
    }
}

impl<T: Transport> ResolveCapable for DiskstationController<T> {
    fn resolve_track(&mut self, uri: &str) -> Result<PlaybackDescriptor> {
        self.resolver().resolve(uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{login_response, ScriptedTransport};
    use crate::SdkError;
    use serde_json::json;

    const REMOTE_PLAYER: &str = "SYNO.AudioStation.RemotePlayer";
    const PLAYBACK: &str = "SYNO.VideoStation2.Controller.Playback";

    fn transport() -> ScriptedTransport {
        ScriptedTransport::new(|req| match (req.api(), req.method()) {
            (_, "login") => Ok(login_response(req)),
            ("SYNO.VideoStation2.Controller.Device", "list") => Ok(Some(json!({"device": [
                {"id": "d1", "title": "Living Room", "type": "chromecast"},
                {"id": "d2", "title": "Bedroom", "type": "dlna"}
            ]}))),
            (REMOTE_PLAYER, "list") => Ok(Some(json!({"players": [
                {"id": "uuid:k", "name": "Kitchen", "type": "upnp"}
            ]}))),
            (REMOTE_PLAYER, "getplaylist") => Ok(Some(json!({"total": 4}))),
            _ => Ok(None),
        })
    }

    fn synced() -> DiskstationController<ScriptedTransport> {
        let mut controller =
            DiskstationController::new(transport(), Credentials::new("admin", "secret"), Mode::Video)
                .with_preferred_room(Mode::Video, "Bedroom");
        controller.sync_devices().unwrap();
        controller
    }

    #[test]
    fn test_sync_devices_applies_preferred_rooms() {
        let controller = synced();

        assert_eq!(controller.default_device(Mode::Video).unwrap().id, "d2");
        assert_eq!(controller.default_device(Mode::Audio).unwrap().id, "uuid:k");
        assert_eq!(controller.devices(Mode::Video).len(), 2);
    }

    #[test]
    fn test_sync_devices_tolerates_one_failing_mode() {
        let transport = ScriptedTransport::new(|req| match (req.api(), req.method()) {
            (_, "login") => Ok(login_response(req)),
            ("SYNO.VideoStation2.Controller.Device", "list") => {
                Ok(Some(json!({"device": [{"id": "d1", "title": "Living Room"}]})))
            }
            _ => Ok(Some(json!({"players": []}))),
        });
        let mut controller = DiskstationController::new(transport, Credentials::new("a", "b"), Mode::Video);

        assert!(controller.sync_devices().is_ok());
        assert_eq!(controller.default_device(Mode::Video).unwrap().id, "d1");
        assert!(controller.default_device(Mode::Audio).is_none());
    }

    #[test]
    fn test_switch_room_refreshes_empty_registry() {
        let mut controller = DiskstationController::new(transport(), Credentials::new("a", "b"), Mode::Video);

        assert!(controller.switch_room("Kitchen", Some(Mode::Audio)).unwrap());
        assert_eq!(controller.current_mode(), Mode::Audio);
        assert_eq!(controller.default_device(Mode::Audio).unwrap().id, "uuid:k");
        assert_eq!(controller.gateway().transport().count(REMOTE_PLAYER, "list"), 1);
    }

    #[test]
    fn test_switch_room_unknown_keeps_default() {
        let mut controller = synced();

        assert!(!controller.switch_room("Garage", None).unwrap());
        assert_eq!(controller.default_device(Mode::Video).unwrap().id, "d2");
    }

    #[test]
    fn test_perform_room_request_adds_device_key() {
        let mut controller = synced();

        controller
            .perform_room_request(DsRequest::new(PLAYBACK, "stop", 2))
            .unwrap();
        let sent = controller.gateway().transport().last(PLAYBACK, "stop").unwrap();
        assert_eq!(sent.get_param("device_id"), Some("d2"));

        controller.switch_mode(Mode::Audio);
        controller
            .perform_room_request(DsRequest::new(REMOTE_PLAYER, "getstatus", 1))
            .unwrap();
        let sent = controller.gateway().transport().last(REMOTE_PLAYER, "getstatus").unwrap();
        assert_eq!(sent.get_param("id"), Some("uuid:k"));
    }

    #[test]
    fn test_perform_room_request_without_device() {
        let mut controller = DiskstationController::new(transport(), Credentials::new("a", "b"), Mode::Video);

        let err = controller
            .perform_room_request(DsRequest::new(PLAYBACK, "stop", 2))
            .unwrap_err();
        assert!(matches!(err, SdkError::NoDevice(Mode::Video)));
        assert!(controller.gateway().transport().requests().is_empty());
    }

    #[test]
    fn test_handle_command_messages() {
        let mut controller = synced();

        assert_eq!(controller.handle_command("cmd:stop").unwrap(), None);
        assert_eq!(
            controller.handle_command("cmd:dance").unwrap().as_deref(),
            Some("Hmm, I don't recognize that command : cmd:dance")
        );
        assert!(controller.handle_command("cmd:clear").unwrap().is_some());
    }

    #[test]
    fn test_play_video_token() {
        let mut controller = synced();
        controller.switch_mode(Mode::Audio);

        let token: PlayToken = r#"dsvideo:{"api":"SYNO.VideoStation2.Controller.Playback","method":"play","file_id":55,"playback_target":"file_id","version":2}"#
            .parse()
            .unwrap();
        controller.play(&token).unwrap();

        assert_eq!(controller.current_mode(), Mode::Video);
        let sent = controller.gateway().transport().last(PLAYBACK, "play").unwrap();
        assert_eq!(sent.get_param("device_id"), Some("d2"));
        assert_eq!(sent.get_param("file_id"), Some("55"));
        assert_eq!(sent.get_param("playback_target"), Some("file_id"));
    }

    #[test]
    fn test_play_audio_album_token() {
        let mut controller = synced();

        let token = PlayToken::Audio(AudioPlayToken::album("Foo", Some("Bar".to_string())));
        controller.play(&token).unwrap();

        assert_eq!(controller.current_mode(), Mode::Audio);
        let sent = controller
            .gateway()
            .transport()
            .last(REMOTE_PLAYER, "updateplaylist")
            .unwrap();
        assert_eq!(sent.get_param("id"), Some("uuid:k"));
        assert_eq!(sent.get_param("limit"), Some("4"));
        assert_eq!(sent.get_param("songs"), Some(""));
        assert_eq!(sent.get_param("play"), Some("true"));
        assert_eq!(
            sent.get_param("containers_json"),
            Some(r#"[{"type":"album","album":"Foo","album_artist":"Bar","sort_by":"name","sort_direction":"ASC"}]"#)
        );
    }

    #[test]
    fn test_play_audio_song_token() {
        let mut controller = synced();

        controller
            .play(&PlayToken::Audio(AudioPlayToken::song("music_42")))
            .unwrap();

        let sent = controller
            .gateway()
            .transport()
            .last(REMOTE_PLAYER, "updateplaylist")
            .unwrap();
        assert_eq!(sent.get_param("songs"), Some("music_42"));
        assert!(!sent.has_param("containers_json"));
    }
}
