//! Snapshot serialization: player state to/from a flat JSON blob.
//!
//! The blob is what the save slot holds. Reading is forgiving in shape
//! (unknown fields ignored, missing fields defaulted) and strict in
//! content: anything that would break an engine invariant is rejected,
//! and load_snapshot() turns every rejection into the default state.

use crate::{
    config::GameConfig,
    error::{GameError, GameResult},
    player::PlayerState,
};

pub fn serialize_snapshot(state: &PlayerState) -> GameResult<String> {
    Ok(serde_json::to_string(state)?)
}

/// Parse and validate a snapshot against the board and catalog it will
/// be played on. The fast-track flag is recomputed, never trusted.
pub fn parse_snapshot(data: &str, config: &GameConfig) -> GameResult<PlayerState> {
    let value: serde_json::Value = serde_json::from_str(data)
        .map_err(|e| malformed(format!("not JSON: {e}")))?;
    if !value.is_object() {
        return Err(malformed("top level is not an object"));
    }
    let mut state: PlayerState = serde_json::from_value(value)
        .map_err(|e| malformed(format!("bad field: {e}")))?;

    if state.salary < 0 || state.expenses < 0 || state.passive_income < 0 {
        return Err(malformed("salary, expenses and passive income must be >= 0"));
    }
    if state.turn == 0 {
        return Err(malformed("turn must be >= 1"));
    }
    if state.position >= config.board.len() {
        return Err(malformed(format!(
            "position {} is off a {}-space board",
            state.position,
            config.board.len()
        )));
    }
    if let Some(unknown) = state
        .owned_assets
        .iter()
        .find(|id| config.catalog.get(id).is_none())
    {
        return Err(malformed(format!("owns unknown asset '{unknown}'")));
    }

    state.check_fast_track();
    Ok(state)
}

/// Restore a player from a save blob. Absent or unreadable data yields
/// the default state; this never fails.
pub fn load_snapshot(data: Option<&str>, config: &GameConfig) -> PlayerState {
    let Some(data) = data else {
        return PlayerState::default();
    };
    match parse_snapshot(data, config) {
        Ok(state) => state,
        Err(e) => {
            log::warn!("Discarding saved game, starting fresh: {e}");
            PlayerState::default()
        }
    }
}

fn malformed(reason: impl Into<String>) -> GameError {
    GameError::MalformedSnapshot { reason: reason.into() }
}
