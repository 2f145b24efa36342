//! Shared primitive types used across the entire game.

/// Whole-dollar amounts. Signed because payday may push cash below zero.
pub type Money = i64;

/// Index of a space on the board.
pub type Position = usize;

/// One turn = one dice roll.
pub type Turn = u32;

/// A stable catalog identifier, e.g. "small-rental".
pub type AssetId = String;

pub type CardId = u32;

/// The canonical game (save slot) identifier.
pub type GameId = String;
