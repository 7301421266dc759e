//! Web API operations used by the playback core
//!
//! Grouped by API family: login and API discovery, Video Station and
//! Audio Station.

pub mod audio;
pub mod auth;
pub mod video;
