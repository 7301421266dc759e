//! High-level DiskStation Web API for Audio and Video Station
//!
//! This crate provides typed operations for the Web API calls a playback
//! controller needs. It uses the private `http-client` crate for the
//! HTTP and envelope handling.
//!
//! ```rust,no_run
//! use dsplay_api::{ApiPathTable, DsClient, Transport};
//! use dsplay_api::operations::video::ListVideoDevicesOperation;
//!
//! let client = DsClient::new("http://diskstation:5000/webapi", ApiPathTable::builtin());
//! let devices = client.execute(&ListVideoDevicesOperation {})?;
//! for device in devices.device {
//!     println!("{} ({})", device.title, device.id);
//! }
//! # Ok::<(), dsplay_api::ApiError>(())
//! ```
//!
//! Most calls need a session id (`_sid`); this crate does not manage
//! sessions, the caller adds the parameter.

pub mod artwork;
pub mod client;
pub mod error;
pub mod mode;
pub mod operation;
pub mod operations;
pub mod paths;
pub mod request;

pub use client::{DsClient, Transport};
pub use error::{ApiError, Result};
pub use http_client::{vendor_message, Timeouts};
pub use mode::Mode;
pub use operation::{DsOperation, NoContent};
pub use paths::{ApiInfo, ApiPathTable};
pub use request::{DsRequest, IdList, SID_PARAM};
