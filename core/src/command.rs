use crate::{
    event::GameEvent,
    player::PlayerState,
    types::{AssetId, Money, Position},
};
use serde::{Deserialize, Serialize};

/// All player-issued commands.
/// Variants added as features land; never removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PlayerCommand {
    Roll,
    Payday,
    BuyAsset { asset_id: AssetId },
    SellAsset { index: usize },
    Reset,
}

/// What a single command produced, ready for the driver to render.
#[derive(Debug, Clone, Serialize)]
pub struct CommandOutcome {
    pub events:   Vec<GameEvent>,
    pub messages: Vec<String>,
    pub state:    PlayerState,
}

/// Result of one roll_and_advance call.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TurnReport {
    pub roll:         u64,
    pub new_position: Position,
    pub events:       Vec<GameEvent>,
    pub messages:     Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Payday {
    pub income:   Money,
    pub new_cash: Money,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Purchase {
    pub asset_id:       AssetId,
    pub cost:           Money,
    pub passive_income: Money,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Sale {
    pub asset_id:  AssetId,
    pub recovered: Money,
}
