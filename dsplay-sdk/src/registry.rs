//! Known playback devices of one mode
//!
//! Video Station calls them devices and Audio Station calls them remote
//! players; both end up as [`Device`] entries keyed by their display name.

use std::collections::BTreeMap;

use dsplay_api::operations::audio::ListRemotePlayersOperation;
use dsplay_api::operations::video::ListVideoDevicesOperation;
use dsplay_api::{Mode, Transport};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::gateway::Gateway;
use crate::{Result, SdkError};

/// A playback endpoint (room)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Device {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Device {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: kind.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DeviceRegistry {
    mode: Mode,
    devices: BTreeMap<String, Device>,
    default_device_id: Option<String>,
}

impl DeviceRegistry {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            devices: BTreeMap::new(),
            default_device_id: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Devices in name order
    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.devices.values()
    }

    pub fn by_name(&self, name: &str) -> Option<&Device> {
        self.devices.get(name)
    }

    pub fn by_id(&self, id: &str) -> Option<&Device> {
        self.devices.values().find(|d| d.id == id)
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.by_id(id).is_some()
    }

    pub fn default_device_id(&self) -> Option<&str> {
        self.default_device_id.as_deref()
    }

    pub fn default_device(&self) -> Option<&Device> {
        self.default_device_id.as_deref().and_then(|id| self.by_id(id))
    }

    /// Swap in a new device snapshot
    ///
    /// Names must be unique; of two devices sharing a name the first one
    /// is kept. The default id is left alone even when the snapshot no
    /// longer contains it, so a later [`ensure_known`](Self::ensure_known)
    /// notices the stale selection.
    pub fn replace(&mut self, devices: impl IntoIterator<Item = Device>) {
        let mut map = BTreeMap::new();
        for device in devices {
            if map.contains_key(&device.name) {
                warn!(mode = %self.mode, name = %device.name, id = %device.id, "duplicate device name, ignoring");
                continue;
            }
            map.insert(device.name.clone(), device);
        }
        self.devices = map;
    }

    /// Reload the device list from the server
    pub fn refresh<T: Transport>(&mut self, gateway: &mut Gateway<T>) -> Result<()> {
        let devices: Vec<Device> = match self.mode {
            Mode::Video => gateway
                .execute(self.mode, &ListVideoDevicesOperation {})?
                .device
                .into_iter()
                .map(|d| Device::new(d.id, d.title, d.kind))
                .collect(),
            Mode::Audio => gateway
                .execute(self.mode, &ListRemotePlayersOperation {})?
                .players
                .into_iter()
                .map(|p| Device::new(p.id, p.name, p.kind))
                .collect(),
        };

        self.replace(devices);
        info!(mode = %self.mode, devices = self.devices.len(), "device registry refreshed");
        Ok(())
    }

    /// Select the default device by name
    ///
    /// An unknown or absent name falls back to the first device in name
    /// order. Fails only when there is no device at all.
    pub fn set_default(&mut self, preferred: Option<&str>) -> Result<&Device> {
        let chosen = match preferred.and_then(|name| self.devices.get(name)) {
            Some(device) => device,
            None => {
                let fallback = self
                    .devices
                    .values()
                    .next()
                    .ok_or(SdkError::NoDevice(self.mode))?;
                warn!(
                    mode = %self.mode,
                    preferred = preferred.unwrap_or("<none>"),
                    fallback = %fallback.name,
                    "preferred device not found, using fallback"
                );
                fallback
            }
        };

        info!(mode = %self.mode, device = %chosen.name, "default device set");
        self.default_device_id = Some(chosen.id.clone());
        Ok(chosen)
    }

    /// Make a known device the default; unknown names leave it unchanged
    pub fn select(&mut self, name: &str) -> bool {
        match self.devices.get(name) {
            Some(device) => {
                self.default_device_id = Some(device.id.clone());
                info!(mode = %self.mode, device = %name, "default device set");
                true
            }
            None => false,
        }
    }

    /// Check a device id, refreshing at most once when it is unknown
    pub fn ensure_known<T: Transport>(&mut self, gateway: &mut Gateway<T>, device_id: &str) -> Result<()> {
        if self.contains_id(device_id) {
            return Ok(());
        }

        debug!(mode = %self.mode, device_id, "unknown device, refreshing");
        self.refresh(gateway)?;

        if self.contains_id(device_id) {
            Ok(())
        } else {
            Err(SdkError::UnknownDevice {
                mode: self.mode,
                device_id: device_id.to_string(),
            })
        }
    }

    /// Id of the default device, verified against the server's list
    pub fn current_device<T: Transport>(&mut self, gateway: &mut Gateway<T>) -> Result<String> {
        let device_id = self
            .default_device_id
            .clone()
            .ok_or(SdkError::NoDevice(self.mode))?;
        self.ensure_known(gateway, &device_id)?;
        Ok(device_id)
    }
}
