//! Routes scanned codes to a controller

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use dsplay_sdk::{CommandCapable, ResolveCapable};
use tracing::{info, warn};

use crate::codes::ScannedCode;

pub struct Host<C> {
    controller: C,
    last_code: Option<String>,
    last_device_file: Option<PathBuf>,
}

impl<C: CommandCapable + ResolveCapable> Host<C> {
    pub fn new(controller: C) -> Self {
        Self {
            controller,
            last_code: None,
            last_device_file: None,
        }
    }

    /// Remember the selected room in `path` across restarts
    pub fn with_last_device_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.last_device_file = Some(path.into());
        self
    }

    pub fn controller(&self) -> &C {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut C {
        &mut self.controller
    }

    /// Select the room saved by a previous run, if any
    ///
    /// Failures are logged; the host keeps running without a room.
    pub fn restore_last_device(&mut self) {
        let Some(path) = &self.last_device_file else {
            return;
        };
        let Ok(room) = fs::read_to_string(path) else {
            return;
        };
        let room = room.trim();
        if room.is_empty() {
            return;
        }

        info!(room, "restoring last used room");
        match self.controller.switch_room(room, None) {
            Ok(true) => {}
            Ok(false) => warn!(room, "last used room is no longer known"),
            Err(e) => warn!(room, error = %e, "could not restore last used room"),
        }
    }

    /// Handle one scanned code
    ///
    /// A non-command code identical to the previous handled one is
    /// ignored, since a card held in front of the camera is read many
    /// times. A code that failed is not remembered, so scanning it again
    /// retries.
    pub fn handle(&mut self, raw: &str) -> Result<()> {
        let code: ScannedCode = raw.parse()?;
        if !code.repeatable() && self.last_code.as_deref() == Some(raw) {
            info!(code = raw, "ignoring repeated code");
            return Ok(());
        }

        self.route(code)?;
        self.last_code = Some(raw.to_string());
        Ok(())
    }

    fn route(&mut self, code: ScannedCode) -> Result<()> {
        match code {
            ScannedCode::Command(word) => {
                if let Some(message) = self.controller.handle_command(&word)? {
                    println!("{}", message);
                }
            }
            ScannedCode::SwitchMode(mode) => self.controller.switch_mode(mode),
            ScannedCode::SwitchRoom(room) => {
                if self.controller.switch_room(&room, None)? {
                    self.save_last_device(&room)?;
                } else {
                    warn!(room = %room, "unknown room");
                }
            }
            ScannedCode::Play(token) => self.controller.play(&token)?,
            ScannedCode::Reference(uri) => {
                let descriptor = self.controller.resolve_track(&uri)?;
                info!(title = %descriptor.title, "playing");
                self.controller.play(&descriptor.play_token)?;
            }
        }
        Ok(())
    }

    /// Handle codes in order, logging failures without stopping
    pub fn handle_all<I, S>(&mut self, codes: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut failures = 0;
        for code in codes {
            let code = code.as_ref();
            if let Err(e) = self.handle(code) {
                warn!(code, error = %format!("{:#}", e), "failed to handle code");
                failures += 1;
            }
        }
        failures
    }

    fn save_last_device(&self, room: &str) -> Result<()> {
        if let Some(path) = &self.last_device_file {
            fs::write(path, room).with_context(|| format!("failed to write {}", path.display()))?;
        }
        Ok(())
    }
}
