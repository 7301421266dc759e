use dsplay_api::Mode;
use tracing::{info, warn};

use crate::registry::DeviceRegistry;

/// Which mode is active, plus the device registry of each mode
///
/// Switching touches no network; the registries are refreshed by whoever
/// owns the gateway.
#[derive(Debug, Clone)]
pub struct ModeContext {
    current: Mode,
    audio: DeviceRegistry,
    video: DeviceRegistry,
}

impl ModeContext {
    pub fn new(initial: Mode) -> Self {
        Self {
            current: initial,
            audio: DeviceRegistry::new(Mode::Audio),
            video: DeviceRegistry::new(Mode::Video),
        }
    }

    pub fn current_mode(&self) -> Mode {
        self.current
    }

    pub fn switch_mode(&mut self, mode: Mode) {
        if self.current != mode {
            info!(from = %self.current, to = %mode, "switching mode");
            self.current = mode;
        }
    }

    pub fn registry(&self, mode: Mode) -> &DeviceRegistry {
        match mode {
            Mode::Audio => &self.audio,
            Mode::Video => &self.video,
        }
    }

    pub fn registry_mut(&mut self, mode: Mode) -> &mut DeviceRegistry {
        match mode {
            Mode::Audio => &mut self.audio,
            Mode::Video => &mut self.video,
        }
    }

    pub fn current_registry(&self) -> &DeviceRegistry {
        self.registry(self.current)
    }

    /// Make `name` the default device, optionally switching mode first
    ///
    /// Returns false, leaving the default as it was, when the room is not
    /// known in that mode.
    pub fn switch_room(&mut self, name: &str, mode: Option<Mode>) -> bool {
        if let Some(mode) = mode {
            self.switch_mode(mode);
        }

        let current = self.current;
        let found = self.registry_mut(current).select(name);
        if !found {
            warn!(mode = %current, room = name, "room not found, keeping current device");
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Device;

    fn context() -> ModeContext {
        let mut context = ModeContext::new(Mode::Video);
        context
            .registry_mut(Mode::Audio)
            .replace(vec![Device::new("uuid:k", "Kitchen", "upnp")]);
        context
            .registry_mut(Mode::Video)
            .replace(vec![Device::new("d1", "Living Room", "chromecast")]);
        context
    }

    #[test]
    fn test_switch_mode() {
        let mut context = context();
        assert_eq!(context.current_mode(), Mode::Video);

        context.switch_mode(Mode::Audio);
        assert_eq!(context.current_mode(), Mode::Audio);
        assert_eq!(context.current_registry().mode(), Mode::Audio);
    }

    #[test]
    fn test_switch_room_with_mode() {
        let mut context = context();

        assert!(context.switch_room("Kitchen", Some(Mode::Audio)));
        assert_eq!(context.current_mode(), Mode::Audio);
        assert_eq!(context.registry(Mode::Audio).default_device_id(), Some("uuid:k"));
        assert_eq!(context.registry(Mode::Video).default_device_id(), None);
    }

    #[test]
    fn test_switch_room_unknown() {
        let mut context = context();
        context.switch_room("Living Room", None);

        assert!(!context.switch_room("Kitchen", None));
        assert_eq!(context.registry(Mode::Video).default_device_id(), Some("d1"));
    }
}
