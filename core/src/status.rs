//! Composite status derived from the tiles found so far.
//!
//! The grade depends on which tiles showed up together. Park and Serenity are
//! interchangeable for grading, as are Lunaro and Ramp; when both of a pair are
//! present the first-named one (Park, Lunaro) is the one shown.

use std::collections::BTreeSet;

use cascade_types::{StatusColor, TileTag};

pub const MISSION_ACTIVE: &str = "Mission Active";
pub const MISSION_ENDED: &str = "Mission Ended";
pub const LOOKING_FOR_TILES: &str = "Mission Active - Looking for tiles...";
pub const NO_TILES_FOUND: &str = "No tiles found!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub text: String,
    pub color: StatusColor,
}

impl Status {
    fn new(text: String, color: StatusColor) -> Self {
        Self { text, color }
    }
}

fn first_present(tiles: &BTreeSet<TileTag>, pair: [TileTag; 2]) -> Option<TileTag> {
    pair.into_iter().find(|t| tiles.contains(t))
}

/// Derive the status from scratch for a tile set.
///
/// Returns `None` for an empty set; the caller keeps whatever status it had.
pub fn derive_status(tiles: &BTreeSet<TileTag>) -> Option<Status> {
    let hangar = tiles.contains(&TileTag::Hangar);
    let park = first_present(tiles, [TileTag::Park, TileTag::Serenity]);
    let living = first_present(tiles, [TileTag::Lunaro, TileTag::Ramp]);

    let status = match (hangar, park, living) {
        (true, Some(p), Some(l)) => Status::new(
            format!("Tiles Found: (A) Hangar + {p} + {l}"),
            StatusColor::Cyan,
        ),
        (true, Some(p), None) => {
            Status::new(format!("Tiles Found: (A) Hangar + {p}"), StatusColor::Cyan)
        }
        (true, None, Some(l)) => {
            Status::new(format!("Tiles Found: (B) Hangar + {l}"), StatusColor::Green)
        }
        (true, None, None) => Status::new("Tile Found: (B) Hangar".to_string(), StatusColor::Green),
        (false, Some(p), Some(l)) => {
            Status::new(format!("Tiles Found: (C) {p} + {l}"), StatusColor::Yellow)
        }
        (false, Some(p), None) => Status::new(format!("Tile Found: (C) {p}"), StatusColor::Yellow),
        (false, None, Some(l)) => Status::new(format!("Tile Found: (D) {l}"), StatusColor::Red),
        (false, None, None) => return None,
    };

    Some(status)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(tiles: &[TileTag]) -> BTreeSet<TileTag> {
        tiles.iter().copied().collect()
    }

    fn derive(tiles: &[TileTag]) -> (String, StatusColor) {
        let status = derive_status(&set(tiles)).expect("non-empty set has a status");
        (status.text, status.color)
    }

    #[test]
    fn test_empty_set_has_no_status() {
        assert_eq!(derive_status(&BTreeSet::new()), None);
    }

    #[test]
    fn test_grade_a() {
        use TileTag::*;
        assert_eq!(
            derive(&[Hangar, Serenity, Ramp]),
            ("Tiles Found: (A) Hangar + Serenity + Ramp".into(), StatusColor::Cyan)
        );
        assert_eq!(
            derive(&[Hangar, Park]),
            ("Tiles Found: (A) Hangar + Park".into(), StatusColor::Cyan)
        );
    }

    #[test]
    fn test_grade_b_wins_over_hangar_alone() {
        use TileTag::*;
        assert_eq!(
            derive(&[Hangar, Lunaro]),
            ("Tiles Found: (B) Hangar + Lunaro".into(), StatusColor::Green)
        );
        assert_eq!(
            derive(&[Hangar]),
            ("Tile Found: (B) Hangar".into(), StatusColor::Green)
        );
    }

    #[test]
    fn test_grade_c_and_d() {
        use TileTag::*;
        assert_eq!(
            derive(&[Serenity, Lunaro]),
            ("Tiles Found: (C) Serenity + Lunaro".into(), StatusColor::Yellow)
        );
        assert_eq!(
            derive(&[Park]),
            ("Tile Found: (C) Park".into(), StatusColor::Yellow)
        );
        assert_eq!(
            derive(&[Ramp]),
            ("Tile Found: (D) Ramp".into(), StatusColor::Red)
        );
    }

    #[test]
    fn test_pair_tie_break_prefers_first_named() {
        use TileTag::*;
        assert_eq!(derive(&[Park, Serenity]).0, "Tile Found: (C) Park");
        assert_eq!(derive(&[Lunaro, Ramp]).0, "Tile Found: (D) Lunaro");
        assert_eq!(
            derive(&[Hangar, Park, Serenity, Lunaro, Ramp]).0,
            "Tiles Found: (A) Hangar + Park + Lunaro"
        );
    }
}
