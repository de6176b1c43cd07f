use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop (or prevent) the tracking loop.
///
/// None of these affect readers: the last published snapshot stays available.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The log file could not be opened when tracking was requested
    #[error("log file not found at {}: {source}", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading from an already-open log failed
    #[error("error reading log file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("tracking loop is already running")]
    AlreadyRunning,
}

/// Errors from persisting the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to save configuration: {0}")]
    Save(#[from] confy::ConfyError),
}
