use std::collections::BTreeSet;

use cascade_types::{AWAITING_CASCADE, AWAITING_MISSION, StatusColor, StatusSnapshot, TileTag};
use chrono::Utc;

/// Whether a mission is currently being watched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissionState {
    #[default]
    Idle,
    Active,
}

/// Pure storage for session state.
/// Transition logic lives in the signal processor.
///
/// Every mutation that actually changes something bumps `revision`, which is
/// how the tracker decides whether a line produced a new snapshot.
#[derive(Debug, Clone)]
pub struct SessionCache {
    mission_state: MissionState,
    attempts: u32,
    tiles: BTreeSet<TileTag>,

    status_text: String,
    status_color: StatusColor,
    mission_status: String,

    /// Set once the end notice for the current mission has fired
    end_notified: bool,

    revision: u64,
}

impl Default for SessionCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionCache {
    pub fn new() -> Self {
        Self {
            mission_state: MissionState::Idle,
            attempts: 0,
            tiles: BTreeSet::new(),
            status_text: AWAITING_CASCADE.to_string(),
            status_color: StatusColor::Red,
            mission_status: AWAITING_MISSION.to_string(),
            end_notified: false,
            revision: 0,
        }
    }

    // --- Accessors ---

    pub fn mission_state(&self) -> MissionState {
        self.mission_state
    }

    pub fn is_mission_active(&self) -> bool {
        self.mission_state == MissionState::Active
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn tiles(&self) -> &BTreeSet<TileTag> {
        &self.tiles
    }

    pub fn has_tile(&self, tile: TileTag) -> bool {
        self.tiles.contains(&tile)
    }

    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    pub fn status_color(&self) -> StatusColor {
        self.status_color
    }

    pub fn mission_status(&self) -> &str {
        &self.mission_status
    }

    pub fn end_notified(&self) -> bool {
        self.end_notified
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    // --- Mutation ---

    pub fn set_mission_state(&mut self, state: MissionState) {
        if self.mission_state != state {
            self.mission_state = state;
            self.bump();
        }
    }

    /// Count a new mission attempt and return the new total.
    pub fn increment_attempts(&mut self) -> u32 {
        self.attempts += 1;
        self.bump();
        self.attempts
    }

    /// Returns true if the tile was not already present.
    pub fn insert_tile(&mut self, tile: TileTag) -> bool {
        let inserted = self.tiles.insert(tile);
        if inserted {
            self.bump();
        }
        inserted
    }

    /// Returns true if any tiles were removed.
    pub fn clear_tiles(&mut self) -> bool {
        if self.tiles.is_empty() {
            return false;
        }
        self.tiles.clear();
        self.bump();
        true
    }

    pub fn set_status(&mut self, text: impl Into<String>, color: StatusColor) {
        let text = text.into();
        if self.status_text != text || self.status_color != color {
            self.status_text = text;
            self.status_color = color;
            self.bump();
        }
    }

    pub fn set_mission_status(&mut self, status: impl Into<String>) {
        let status = status.into();
        if self.mission_status != status {
            self.mission_status = status;
            self.bump();
        }
    }

    pub fn set_end_notified(&mut self, notified: bool) {
        self.end_notified = notified;
    }

    fn bump(&mut self) {
        self.revision += 1;
    }

    // --- Export ---

    /// Copy the current state out for readers.
    pub fn to_snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            status_text: self.status_text.clone(),
            status_color: self.status_color,
            mission_status: self.mission_status.clone(),
            attempts: self.attempts,
            tiles_found: self.tiles.iter().copied().collect(),
            timestamp: Utc::now(),
        }
    }
}
