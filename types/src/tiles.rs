use serde::{Deserialize, Serialize};
use std::fmt;

/// A room layout that can appear in a Void Cascade mission.
///
/// Ordering follows declaration order and is the canonical order tiles are
/// reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileTag {
    Hangar,
    Park,
    Serenity,
    Lunaro,
    Ramp,
}

impl TileTag {
    pub const ALL: [TileTag; 5] = [
        TileTag::Hangar,
        TileTag::Park,
        TileTag::Serenity,
        TileTag::Lunaro,
        TileTag::Ramp,
    ];

    /// Display name used in status text.
    pub fn name(self) -> &'static str {
        match self {
            TileTag::Hangar => "Hangar",
            TileTag::Park => "Park",
            TileTag::Serenity => "Serenity",
            TileTag::Lunaro => "Lunaro",
            TileTag::Ramp => "Ramp",
        }
    }
}

impl fmt::Display for TileTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
