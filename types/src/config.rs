//! Persisted scanner configuration.
//!
//! Loading and saving live in `cascade-core`; this is only the shape of the
//! TOML file. Every field has a default, so a partial file is fine.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Path to `EE.log`. Empty means the platform default location.
    pub log_path: String,
    /// Address the status endpoint listens on
    pub bind_address: String,
    pub poll: PollSettings,
    pub heartbeat: HeartbeatSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_path: String::new(),
            bind_address: "0.0.0.0:9000".to_string(),
            poll: PollSettings::default(),
            heartbeat: HeartbeatSettings::default(),
        }
    }
}

/// How often to check the log for new data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollSettings {
    /// While a mission is active
    pub active_ms: u64,
    /// Otherwise
    pub idle_ms: u64,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            active_ms: 10,
            idle_ms: 100,
        }
    }
}

/// How often the tracker reports that it is still reading lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeartbeatSettings {
    pub active_secs: u64,
    pub idle_secs: u64,
}

impl Default for HeartbeatSettings {
    fn default() -> Self {
        Self {
            active_secs: 5,
            idle_secs: 30,
        }
    }
}
