//! Transport commands
//!
//! A scanned command card carries one of a handful of words. What each
//! word turns into depends on the active mode: Video Station drives a
//! renderer through its playback API, Audio Station drives a remote
//! player through `control` and `updateplaylist`.

use std::fmt;
use std::str::FromStr;

use dsplay_api::operations::audio::{
    GetPlaylistOperation, PlayerAction, RemotePlayerControlOperation, UpdatePlaylistOperation,
};
use dsplay_api::operations::video::{
    NextPlaybackOperation, PausePlaybackOperation, PreviousPlaybackOperation, ResumePlaybackOperation,
    StopPlaybackOperation,
};
use dsplay_api::{Mode, Transport};
use tracing::{debug, info};

use crate::context::ModeContext;
use crate::gateway::Gateway;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Play,
    Pause,
    Stop,
    Next,
    Previous,
    Clear,
}

impl Command {
    /// Parse a command word, with or without the `cmd:` prefix
    pub fn parse(input: &str) -> Option<Command> {
        let word = input.trim();
        let word = match word.get(..4) {
            Some(prefix) if prefix.eq_ignore_ascii_case("cmd:") => &word[4..],
            _ => word,
        };

        match word.trim().to_ascii_lowercase().as_str() {
            "play" => Some(Command::Play),
            "pause" | "playpause" => Some(Command::Pause),
            "stop" => Some(Command::Stop),
            "next" => Some(Command::Next),
            "previous" | "prev" => Some(Command::Previous),
            "clear" => Some(Command::Clear),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Play => "play",
            Command::Pause => "pause",
            Command::Stop => "stop",
            Command::Next => "next",
            Command::Previous => "previous",
            Command::Clear => "clear",
        }
    }

    fn player_action(&self) -> Option<PlayerAction> {
        match self {
            Command::Play => Some(PlayerAction::Play),
            Command::Pause => Some(PlayerAction::Pause),
            Command::Stop => Some(PlayerAction::Stop),
            Command::Next => Some(PlayerAction::Next),
            Command::Previous => Some(PlayerAction::Prev),
            Command::Clear => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Command {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Command::parse(s).ok_or(())
    }
}

/// What became of a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The command was sent to the device
    Sent(Command),
    /// The audio queue was emptied
    Cleared { removed: u32 },
    /// The active mode has no such command
    NotSupported { command: Command, mode: Mode },
    /// Not a command word at all
    NotRecognized(String),
}

impl CommandOutcome {
    /// Message to show the user, if any
    pub fn user_message(&self) -> Option<String> {
        match self {
            CommandOutcome::Sent(_) | CommandOutcome::Cleared { .. } => None,
            CommandOutcome::NotSupported { command, mode } => {
                Some(format!("The {} command is not supported in {} mode", command, mode))
            }
            CommandOutcome::NotRecognized(input) => {
                Some(format!("Hmm, I don't recognize that command : {}", input))
            }
        }
    }
}

/// Runs commands against the default device of the active mode
pub struct CommandDispatcher<'a, T: Transport> {
    gateway: &'a mut Gateway<T>,
    context: &'a mut ModeContext,
}

impl<'a, T: Transport> CommandDispatcher<'a, T> {
    pub fn new(gateway: &'a mut Gateway<T>, context: &'a mut ModeContext) -> Self {
        Self { gateway, context }
    }

    /// Parse and run a command string
    ///
    /// Unknown words are an outcome, not an error.
    pub fn dispatch(&mut self, input: &str) -> Result<CommandOutcome> {
        match Command::parse(input) {
            Some(command) => self.execute(command),
            None => {
                debug!(input, "unrecognized command");
                Ok(CommandOutcome::NotRecognized(input.to_string()))
            }
        }
    }

    pub fn execute(&mut self, command: Command) -> Result<CommandOutcome> {
        let mode = self.context.current_mode();
        match mode {
            Mode::Video => self.execute_video(command),
            Mode::Audio => self.execute_audio(command),
        }
    }

    fn execute_video(&mut self, command: Command) -> Result<CommandOutcome> {
        let mode = Mode::Video;
        if command == Command::Clear {
            return Ok(CommandOutcome::NotSupported { command, mode });
        }

        let device_id = self.context.registry_mut(mode).current_device(self.gateway)?;
        match command {
            Command::Play => self.gateway.execute(mode, &ResumePlaybackOperation { device_id })?,
            Command::Pause => self.gateway.execute(mode, &PausePlaybackOperation { device_id })?,
            Command::Next => self.gateway.execute(mode, &NextPlaybackOperation { device_id })?,
            Command::Previous => self.gateway.execute(mode, &PreviousPlaybackOperation { device_id })?,
            Command::Stop | Command::Clear => self.gateway.execute(mode, &StopPlaybackOperation { device_id })?,
        };

        info!(mode = %mode, command = %command, "command sent");
        Ok(CommandOutcome::Sent(command))
    }

    fn execute_audio(&mut self, command: Command) -> Result<CommandOutcome> {
        let mode = Mode::Audio;
        let id = self.context.registry_mut(mode).current_device(self.gateway)?;

        let Some(action) = command.player_action() else {
            let length = self.gateway.execute(mode, &GetPlaylistOperation { id: id.clone() })?.total;
            self.gateway.execute(mode, &UpdatePlaylistOperation::truncate(id, length))?;
            info!(mode = %mode, removed = length, "queue cleared");
            return Ok(CommandOutcome::Cleared { removed: length });
        };

        self.gateway.execute(mode, &RemotePlayerControlOperation { id, action })?;
        info!(mode = %mode, command = %command, "command sent");
        Ok(CommandOutcome::Sent(command))
    }
}
