use crate::signal_processor::{MissionSignal, SignalHandler};

/// Writes a human-readable notice for every mission signal.
#[derive(Debug, Default)]
pub struct ActivityLog;

impl ActivityLog {
    pub fn new() -> Self {
        Self
    }
}

impl SignalHandler for ActivityLog {
    fn handle_signal(&mut self, signal: &MissionSignal) {
        match signal {
            MissionSignal::MissionStarted {
                attempt,
                line_number,
                ..
            } => {
                tracing::info!(
                    attempt,
                    line_number,
                    "[Attempt {attempt}] Zariman mission started, switching to fast monitoring"
                );
            }
            MissionSignal::MissionEnded {
                attempt,
                line_number,
                ..
            } => {
                tracing::info!(
                    attempt,
                    line_number,
                    "Mission ended - Attempt {attempt} completed"
                );
            }
            MissionSignal::TileDetected {
                tile, line_number, ..
            } => {
                tracing::info!(%tile, line_number, "Detected {tile} tile");
            }
            MissionSignal::TilesReset { line_number, .. } => {
                tracing::debug!(line_number, "End-of-round marker, tiles cleared");
            }
            MissionSignal::NoTilesFound { line_number, .. } => {
                tracing::info!(line_number, "No tiles found in this mission");
            }
        }
    }
}
