//! # dsplay SDK - playback control for DiskStation Audio and Video Station
//!
//! Turns command words and library references into authenticated Web API
//! calls, keeping a login session and a device list per mode:
//!
//! ```rust,no_run
//! use dsplay_sdk::{CommandCapable, ControllerConfig, DiskstationController, ResolveCapable};
//!
//! fn main() -> Result<(), dsplay_sdk::SdkError> {
//!     let config = ControllerConfig::load(None)?;
//!     let mut controller = DiskstationController::from_config(&config)?;
//!     controller.sync_devices()?;
//!
//!     // Resolve a card and start it on the default room
//!     let descriptor = controller.resolve_track("dsvideo:movie_id=7")?;
//!     println!("{} ({})", descriptor.title, descriptor.artwork_url);
//!     controller.play(&descriptor.play_token)?;
//!
//!     // Transport commands act on the active mode
//!     if let Some(message) = controller.handle_command("cmd:pause")? {
//!         println!("{}", message);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! DiskstationController (CommandCapable + ResolveCapable)
//!     ↓
//! CommandDispatcher / TrackResolver
//!     ↓
//! ModeContext (active mode, DeviceRegistry per mode)
//!     ↓
//! Gateway (SessionManager, one sid per mode)
//!     ↓
//! dsplay-api Transport (DsClient over HTTP)
//! ```
//!
//! Everything is blocking and single-threaded. Every HTTP call is bounded
//! by the connect and request timeouts of the configuration. Callers that
//! share a controller between threads must serialize access themselves.

pub mod config;
pub mod context;
pub mod controller;
pub mod dispatcher;
pub mod dummy;
mod error;
pub mod gateway;
pub mod logging;
pub mod reference;
pub mod registry;
pub mod resolver;
pub mod session;
pub mod token;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use config::ControllerConfig;
pub use context::ModeContext;
pub use controller::{CommandCapable, DiskstationController, ResolveCapable};
pub use dispatcher::{Command, CommandDispatcher, CommandOutcome};
pub use dummy::DummyController;
pub use error::{Result, SdkError};
pub use gateway::Gateway;
pub use reference::TrackReference;
pub use registry::{Device, DeviceRegistry};
pub use resolver::{PlaybackDescriptor, TrackResolver};
pub use session::{Credentials, Session, SessionManager};
pub use token::{AudioPlayToken, PlayToken, VideoPlayToken};

// Re-exports for hosts that build their own requests
pub use dsplay_api::{DsRequest, Mode};
