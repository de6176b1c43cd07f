pub mod context;
pub mod error;
pub mod handlers;
pub mod log;
pub mod patterns;
pub mod signal_processor;
pub mod state;
pub mod status;
pub mod tracker;

// Re-exports for convenience
pub use context::{AppConfig, AppConfigExt, ParsingSession, default_log_path};
pub use error::{ConfigError, TrackerError};
pub use log::{LineSource, PollConfig, decode_line};
pub use patterns::{LineEffect, LineMatch, PatternTable};
pub use signal_processor::{EventProcessor, MissionSignal, SignalHandler};
pub use state::{MissionState, SessionCache};
pub use tracker::{SessionTracker, TrackerConfig};

pub use cascade_types::{StatusColor, StatusSnapshot, TileTag};
