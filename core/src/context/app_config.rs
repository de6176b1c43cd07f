use std::path::PathBuf;
use std::time::Duration;

pub use cascade_types::AppConfig;

use crate::error::ConfigError;
use crate::log::PollConfig;

const APP_NAME: &str = "cascade-scanner";

/// Disk and runtime helpers for [`AppConfig`].
pub trait AppConfigExt: Sized {
    /// Load from the user config directory, falling back to defaults.
    fn load() -> Self;
    fn save(&self) -> Result<(), ConfigError>;
    /// Log file to follow, with the platform default filled in.
    fn log_file(&self) -> PathBuf;
    fn poll_config(&self) -> PollConfig;
    fn heartbeat_interval(&self, active: bool) -> Duration;
}

impl AppConfigExt for AppConfig {
    fn load() -> Self {
        match confy::load::<AppConfig>(APP_NAME, None) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load config, using defaults");
                AppConfig::default()
            }
        }
    }

    fn save(&self) -> Result<(), ConfigError> {
        confy::store(APP_NAME, None, self)?;
        Ok(())
    }

    fn log_file(&self) -> PathBuf {
        if self.log_path.trim().is_empty() {
            default_log_path()
        } else {
            PathBuf::from(&self.log_path)
        }
    }

    fn poll_config(&self) -> PollConfig {
        PollConfig {
            active: Duration::from_millis(self.poll.active_ms),
            idle: Duration::from_millis(self.poll.idle_ms),
        }
    }

    fn heartbeat_interval(&self, active: bool) -> Duration {
        if active {
            Duration::from_secs(self.heartbeat.active_secs)
        } else {
            Duration::from_secs(self.heartbeat.idle_secs)
        }
    }
}

/// Where the game writes `EE.log` on this platform.
pub fn default_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_default()
        .join("Warframe")
        .join("EE.log")
}

/// Location of the config file, if the platform has a config directory.
pub fn config_file_path() -> Option<PathBuf> {
    confy::get_configuration_file_path(APP_NAME, None).ok()
}
