//! Point-in-time view of a tracking session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::TileTag;

/// Status text shown before any mission has been seen, and after one ends.
pub const AWAITING_CASCADE: &str = "Awaiting Cascade...";
/// Mission status shown before the first mission starts.
pub const AWAITING_MISSION: &str = "Awaiting mission...";

/// Color classification attached to the status text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
    Red,
    Green,
    Blue,
    Yellow,
    Cyan,
}

/// Immutable copy of session state handed to readers.
///
/// Field names on the wire match what polling clients already expect
/// (`status`, `status_color`, `mission_status`, `attempts`, `tiles_found`,
/// `timestamp`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    #[serde(rename = "status")]
    pub status_text: String,
    pub status_color: StatusColor,
    pub mission_status: String,
    pub attempts: u32,
    pub tiles_found: Vec<TileTag>,
    /// When this snapshot was produced, in milliseconds since the Unix epoch.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl Default for StatusSnapshot {
    fn default() -> Self {
        Self {
            status_text: AWAITING_CASCADE.to_string(),
            status_color: StatusColor::Red,
            mission_status: AWAITING_MISSION.to_string(),
            attempts: 0,
            tiles_found: Vec::new(),
            timestamp: Utc::now(),
        }
    }
}

impl StatusSnapshot {
    pub fn has_tile(&self, tile: TileTag) -> bool {
        self.tiles_found.contains(&tile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_snapshot_is_idle() {
        let snap = StatusSnapshot::default();
        assert_eq!(snap.status_text, "Awaiting Cascade...");
        assert_eq!(snap.status_color, StatusColor::Red);
        assert_eq!(snap.mission_status, "Awaiting mission...");
        assert_eq!(snap.attempts, 0);
        assert!(snap.tiles_found.is_empty());
    }

    #[test]
    fn test_wire_field_names() {
        let snap = StatusSnapshot {
            status_text: "Tile Found: (B) Hangar".to_string(),
            status_color: StatusColor::Green,
            mission_status: "Mission Active".to_string(),
            attempts: 3,
            tiles_found: vec![TileTag::Hangar, TileTag::Serenity],
            timestamp: DateTime::from_timestamp_millis(1_700_000_000_123).unwrap(),
        };

        let json: serde_json::Value = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["status"], "Tile Found: (B) Hangar");
        assert_eq!(json["status_color"], "green");
        assert_eq!(json["mission_status"], "Mission Active");
        assert_eq!(json["attempts"], 3);
        assert_eq!(json["tiles_found"], serde_json::json!(["hangar", "serenity"]));
        assert_eq!(json["timestamp"], 1_700_000_000_123i64);

        let back: StatusSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back, snap);
    }

    #[test]
    fn test_has_tile() {
        let snap = StatusSnapshot {
            tiles_found: vec![TileTag::Lunaro],
            ..StatusSnapshot::default()
        };
        assert!(snap.has_tile(TileTag::Lunaro));
        assert!(!snap.has_tile(TileTag::Ramp));
    }
}
