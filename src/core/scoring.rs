//! Scoring module - maps core events to score deltas
//!
//! The core emits events; this module is the reference tally the session
//! keeps. External collaborators (timer, leaderboard) consume the same
//! events and the final integer.

use crate::types::{
    GameEvent, SCORE_PER_BOARD_CLEAR, SCORE_PER_BOMB, SCORE_PER_COMBO, SCORE_PER_PLACEMENT,
};

/// Score value of a single event.
///
/// A combo pays per additional contacted piece, so a pair is worth one combo
/// unit; a bomb pays per cluster member and only past the threshold pair.
pub fn score_event(event: &GameEvent) -> u32 {
    match *event {
        GameEvent::PlacementScored => SCORE_PER_PLACEMENT,
        GameEvent::ComboScored(size) => {
            if size <= 1 {
                0
            } else {
                SCORE_PER_COMBO * (size as u32 - 1)
            }
        }
        GameEvent::BombScored(size) => {
            if size <= 2 {
                0
            } else {
                SCORE_PER_BOMB * size as u32
            }
        }
        GameEvent::BoardCleared => SCORE_PER_BOARD_CLEAR,
        GameEvent::GameOverSignal => 0,
    }
}

/// Total score of a batch of events
pub fn score_events(events: &[GameEvent]) -> u32 {
    events.iter().map(score_event).sum()
}
