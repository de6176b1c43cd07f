use cascade_types::StatusColor;
use chrono::Local;

use crate::patterns::PatternTable;
use crate::state::SessionCache;
use crate::status::{NO_TILES_FOUND, derive_status};

use super::MissionSignal;
use super::mission_state::advance_mission_state;

/// Routes classified log lines into session state changes.
///
/// Per line, effects are applied in a fixed order: tiles are added, the
/// mission starts and/or ends, the status is re-derived, then the
/// level-loaded check and the end-of-round reset run.
#[derive(Debug, Default)]
pub struct EventProcessor {
    patterns: PatternTable,
}

impl EventProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one line and return the signals it produced.
    pub fn process_line(
        &self,
        line_number: u64,
        line: &str,
        cache: &mut SessionCache,
    ) -> Vec<MissionSignal> {
        let matched = self.patterns.classify(line);
        if matched.is_empty() {
            return Vec::new();
        }

        let timestamp = Local::now().naive_local();
        let mut signals = Vec::new();

        for &tile in &matched.tiles {
            if cache.insert_tile(tile) {
                signals.push(MissionSignal::TileDetected {
                    tile,
                    line_number,
                    timestamp,
                });
            }
        }

        signals.extend(advance_mission_state(&matched, line_number, timestamp, cache));

        if let Some(status) = derive_status(cache.tiles()) {
            cache.set_status(status.text, status.color);
        }

        if matched.level_loaded && cache.tiles().is_empty() {
            cache.set_status(NO_TILES_FOUND, StatusColor::Red);
            signals.push(MissionSignal::NoTilesFound {
                line_number,
                timestamp,
            });
        }

        // Only once a mission has been seen; the status text is left as is.
        if matched.reset_tiles && cache.attempts() >= 1 && cache.clear_tiles() {
            signals.push(MissionSignal::TilesReset {
                line_number,
                timestamp,
            });
        }

        signals
    }
}
