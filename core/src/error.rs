use crate::types::{AssetId, Money};
use thiserror::Error;

/// Every failure the game can report.
///
/// The domain variants carry a Display string that doubles as the
/// player-facing message; none of them ever leave `PlayerState` mutated.
#[derive(Error, Debug)]
pub enum GameError {
    #[error("Unknown asset '{asset_id}'")]
    UnknownAsset { asset_id: AssetId },

    #[error("Not enough cash to buy {name}: costs ${cost}, you have ${cash}")]
    InsufficientFunds {
        asset_id: AssetId,
        name:     String,
        cost:     Money,
        cash:     Money,
    },

    #[error("Index {index} out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Malformed snapshot: {reason}")]
    MalformedSnapshot { reason: String },

    #[error("Invalid game config: {reason}")]
    InvalidConfig { reason: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GameError {
    /// True for the errors a player can cause by pressing the wrong button.
    /// Everything else points at the host or the data files.
    pub fn is_rule_violation(&self) -> bool {
        matches!(
            self,
            Self::UnknownAsset { .. }
                | Self::InsufficientFunds { .. }
                | Self::IndexOutOfRange { .. }
        )
    }
}

pub type GameResult<T> = Result<T, GameError>;
