//! Line classification.
//!
//! The detection table is plain data: each [`PatternRule`] pairs a substring
//! with the effect a matching line has. Adding a tile or a lifecycle trigger
//! means adding a row to [`BUILTIN_RULES`]; the tracker only ever sees the
//! resulting [`LineMatch`].

use cascade_types::TileTag;
use memchr::memmem::Finder;

/// What a matching line means for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEffect {
    /// A tile's backdrop was loaded
    Tile(TileTag),
    /// The target mission started generating its layout
    MissionStart,
    /// The player is back on the ship or in the hub
    MissionEnd,
    /// The level loader finished
    LevelLoaded,
    /// End-of-round marker; discard tiles but stay in the mission
    ResetTiles,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseSensitivity {
    Sensitive,
    Insensitive,
}

/// One row of the detection table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternRule {
    pub label: &'static str,
    pub needle: &'static str,
    pub case: CaseSensitivity,
    pub effect: LineEffect,
}

impl PatternRule {
    pub const fn tile(label: &'static str, needle: &'static str, tile: TileTag) -> Self {
        Self {
            label,
            needle,
            case: CaseSensitivity::Insensitive,
            effect: LineEffect::Tile(tile),
        }
    }

    pub const fn exact(label: &'static str, needle: &'static str, effect: LineEffect) -> Self {
        Self {
            label,
            needle,
            case: CaseSensitivity::Sensitive,
            effect,
        }
    }
}

pub static BUILTIN_RULES: &[PatternRule] = &[
    // Tile backdrops
    PatternRule::tile("hangar", "[IntShuttleBayBackdrop]", TileTag::Hangar),
    PatternRule::tile("park", "[IntParkBackdrop]", TileTag::Park),
    PatternRule::tile("serenity", "[IntParkBBackdrop]", TileTag::Serenity),
    PatternRule::tile("lunaro", "[IntLunaroCourtBackdrop]", TileTag::Lunaro),
    PatternRule::tile("ramp", "[IntLivingQuartersBackdrop]", TileTag::Ramp),
    // Mission lifecycle
    PatternRule::exact(
        "cascade_layout",
        "/Lotus/Levels/Proc/Zariman/ZarimanDirectionalSurvival generating layout",
        LineEffect::MissionStart,
    ),
    PatternRule::exact(
        "drifter_camp",
        "/Lotus/Levels/Proc/TheNewWar/PartTwo/TNWDrifterCampMain",
        LineEffect::MissionEnd,
    ),
    PatternRule::exact(
        "player_ship",
        "/Lotus/Levels/Proc/PlayerShip",
        LineEffect::MissionEnd,
    ),
    PatternRule::exact(
        "level_loaded",
        "Level loader: LS_POST_CREATE -> LS_COMPLETE",
        LineEffect::LevelLoaded,
    ),
    // End-of-round markers
    PatternRule::exact(
        "state_endless",
        "Zariman Survival (Void Cascade): State Change: ENDLESS",
        LineEffect::ResetTiles,
    ),
    PatternRule::exact(
        "mode_state_4",
        "ZarimanSurvivalMission.lua: ModeState = 4",
        LineEffect::ResetTiles,
    ),
    PatternRule::exact(
        "pillar_cleansing",
        "ZarimanSurvivalMission.lua: Cleansing SurvivalLifeSupportPillarCorruptible",
        LineEffect::ResetTiles,
    ),
];

/// Everything one line triggered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineMatch {
    /// Tiles detected on this line, without duplicates, in table order
    pub tiles: Vec<TileTag>,
    pub mission_start: bool,
    pub mission_end: bool,
    pub level_loaded: bool,
    pub reset_tiles: bool,
}

impl LineMatch {
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
            && !self.mission_start
            && !self.mission_end
            && !self.level_loaded
            && !self.reset_tiles
    }

    fn apply(&mut self, effect: LineEffect) {
        match effect {
            LineEffect::Tile(tile) => {
                if !self.tiles.contains(&tile) {
                    self.tiles.push(tile);
                }
            }
            LineEffect::MissionStart => self.mission_start = true,
            LineEffect::MissionEnd => self.mission_end = true,
            LineEffect::LevelLoaded => self.level_loaded = true,
            LineEffect::ResetTiles => self.reset_tiles = true,
        }
    }
}

struct CompiledRule {
    rule: PatternRule,
    finder: Finder<'static>,
}

/// Detection table with its needles prepared for searching.
pub struct PatternTable {
    rules: Vec<CompiledRule>,
    has_insensitive: bool,
}

impl std::fmt::Debug for PatternTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternTable")
            .field("rules", &self.rules.len())
            .finish()
    }
}

impl Default for PatternTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PatternTable {
    pub fn builtin() -> Self {
        Self::new(BUILTIN_RULES.iter().copied())
    }

    pub fn new(rules: impl IntoIterator<Item = PatternRule>) -> Self {
        let rules: Vec<CompiledRule> = rules
            .into_iter()
            .map(|rule| {
                let needle = match rule.case {
                    CaseSensitivity::Sensitive => rule.needle.to_string(),
                    CaseSensitivity::Insensitive => rule.needle.to_ascii_lowercase(),
                };
                CompiledRule {
                    rule,
                    finder: Finder::new(needle.as_bytes()).into_owned(),
                }
            })
            .collect();
        let has_insensitive = rules
            .iter()
            .any(|c| c.rule.case == CaseSensitivity::Insensitive);

        Self {
            rules,
            has_insensitive,
        }
    }

    pub fn rules(&self) -> impl Iterator<Item = &PatternRule> {
        self.rules.iter().map(|c| &c.rule)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluate every rule against `line`. Rules are independent; a line can
    /// match several of them.
    pub fn classify(&self, line: &str) -> LineMatch {
        let lowered = self.has_insensitive.then(|| line.to_ascii_lowercase());
        let mut matched = LineMatch::default();

        for compiled in &self.rules {
            let haystack = match (compiled.rule.case, &lowered) {
                (CaseSensitivity::Insensitive, Some(lower)) => lower.as_bytes(),
                _ => line.as_bytes(),
            };
            if compiled.finder.find(haystack).is_some() {
                matched.apply(compiled.rule.effect);
            }
        }

        matched
    }
}
