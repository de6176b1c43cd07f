use cascade_types::TileTag;
use chrono::NaiveDateTime;

/// Signals emitted by the EventProcessor for cross-cutting concerns.
/// These represent "interesting things that happened" at a higher level
/// than raw log lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissionSignal {
    // Mission lifecycle
    MissionStarted {
        attempt: u32,
        line_number: u64,
        timestamp: NaiveDateTime,
    },
    /// Fires once per mission, even if several end markers follow
    MissionEnded {
        attempt: u32,
        line_number: u64,
        timestamp: NaiveDateTime,
    },

    // Tile tracking
    TileDetected {
        tile: TileTag,
        line_number: u64,
        timestamp: NaiveDateTime,
    },
    TilesReset {
        line_number: u64,
        timestamp: NaiveDateTime,
    },
    NoTilesFound {
        line_number: u64,
        timestamp: NaiveDateTime,
    },
}

impl MissionSignal {
    pub fn line_number(&self) -> u64 {
        match self {
            MissionSignal::MissionStarted { line_number, .. }
            | MissionSignal::MissionEnded { line_number, .. }
            | MissionSignal::TileDetected { line_number, .. }
            | MissionSignal::TilesReset { line_number, .. }
            | MissionSignal::NoTilesFound { line_number, .. } => *line_number,
        }
    }
}
