//! Shared types for the cascade tile scanner.
//!
//! These are the values that cross the boundary between the tracking core and
//! anything that observes it (the HTTP publisher, the replay tool), plus the
//! shape of the configuration file.

mod config;
mod snapshot;
mod tiles;

pub use config::{AppConfig, HeartbeatSettings, PollSettings};
pub use snapshot::{AWAITING_CASCADE, AWAITING_MISSION, StatusColor, StatusSnapshot};
pub use tiles::TileTag;
