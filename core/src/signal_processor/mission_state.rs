//! Mission state machine.
//!
//! The state machine tracks the lifecycle of a Void Cascade attempt:
//! - Idle: waiting for the mission layout to be generated
//! - Active: mission running, tiles are being collected
//!
//! This module handles transitions between states and emits
//! MissionStarted/MissionEnded signals.

use cascade_types::{AWAITING_CASCADE, StatusColor};
use chrono::NaiveDateTime;

use crate::patterns::LineMatch;
use crate::state::{MissionState, SessionCache};
use crate::status::{LOOKING_FOR_TILES, MISSION_ACTIVE, MISSION_ENDED};

use super::MissionSignal;

/// Apply the lifecycle part of a classified line. Start is handled before end.
pub fn advance_mission_state(
    matched: &LineMatch,
    line_number: u64,
    timestamp: NaiveDateTime,
    cache: &mut SessionCache,
) -> Vec<MissionSignal> {
    let mut signals = Vec::new();

    if matched.mission_start {
        handle_mission_start(cache, line_number, timestamp, &mut signals);
    }
    if matched.mission_end {
        handle_mission_end(cache, line_number, timestamp, &mut signals);
    }

    signals
}

fn handle_mission_start(
    cache: &mut SessionCache,
    line_number: u64,
    timestamp: NaiveDateTime,
    signals: &mut Vec<MissionSignal>,
) {
    match cache.mission_state() {
        MissionState::Idle => {
            let attempt = cache.increment_attempts();
            cache.set_mission_state(MissionState::Active);
            cache.set_end_notified(false);

            signals.push(MissionSignal::MissionStarted {
                attempt,
                line_number,
                timestamp,
            });
        }
        MissionState::Active => {
            // Layout regenerated without leaving the mission: same attempt,
            // but the old tiles no longer describe the level.
            tracing::debug!(
                attempt = cache.attempts(),
                line_number,
                "Mission layout regenerated while active"
            );
        }
    }

    cache.clear_tiles();
    cache.set_mission_status(MISSION_ACTIVE);
    cache.set_status(LOOKING_FOR_TILES, StatusColor::Blue);
}

fn handle_mission_end(
    cache: &mut SessionCache,
    line_number: u64,
    timestamp: NaiveDateTime,
    signals: &mut Vec<MissionSignal>,
) {
    // Hub/ship layouts show up repeatedly; only the first one after a
    // mission ends it.
    if cache.mission_state() == MissionState::Idle {
        return;
    }

    cache.set_mission_state(MissionState::Idle);

    if !cache.end_notified() {
        cache.set_end_notified(true);
        signals.push(MissionSignal::MissionEnded {
            attempt: cache.attempts(),
            line_number,
            timestamp,
        });
    }

    cache.clear_tiles();
    cache.set_mission_status(MISSION_ENDED);
    cache.set_status(AWAITING_CASCADE, StatusColor::Red);
}
