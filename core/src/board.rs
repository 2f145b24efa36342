//! The board: a fixed, cyclic ring of typed spaces.

use crate::{
    error::{GameError, GameResult},
    types::Position,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SpaceKind {
    Payday,
    Opportunity,
    Doodad,
    Market,
}

impl SpaceKind {
    pub fn default_label(&self) -> &'static str {
        match self {
            Self::Payday      => "Payday",
            Self::Opportunity => "Opportunity",
            Self::Doodad      => "Doodad",
            Self::Market      => "Market",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Space {
    pub id:    Position,
    #[serde(rename = "type")]
    pub kind:  SpaceKind,
    pub label: String,
}

impl Space {
    pub fn new(id: Position, kind: SpaceKind) -> Self {
        Self { id, kind, label: kind.default_label().to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Board {
    spaces: Vec<Space>,
}

impl Board {
    /// Build a board, checking ids run 0..N without gaps.
    pub fn new(spaces: Vec<Space>) -> GameResult<Self> {
        let board = Self { spaces };
        board.validate()?;
        Ok(board)
    }

    /// The ten-space ring the game ships with.
    pub fn standard() -> Self {
        use SpaceKind::*;
        let layout = [
            Payday, Opportunity, Doodad, Market, Opportunity,
            Payday, Opportunity, Doodad, Market, Opportunity,
        ];
        Self {
            spaces: layout
                .iter()
                .enumerate()
                .map(|(id, kind)| Space::new(id, *kind))
                .collect(),
        }
    }

    pub fn validate(&self) -> GameResult<()> {
        if self.spaces.is_empty() {
            return Err(GameError::InvalidConfig { reason: "board has no spaces".into() });
        }
        for (expected, space) in self.spaces.iter().enumerate() {
            if space.id != expected {
                return Err(GameError::InvalidConfig {
                    reason: format!("space at index {expected} has id {}", space.id),
                });
            }
        }
        Ok(())
    }

    pub fn space_at(&self, position: Position) -> GameResult<&Space> {
        self.spaces.get(position).ok_or(GameError::IndexOutOfRange {
            index: position,
            len:   self.spaces.len(),
        })
    }

    /// Where a piece at `from` lands after `steps`.
    pub fn wrap(&self, from: Position, steps: usize) -> Position {
        (from + steps) % self.spaces.len()
    }

    pub fn len(&self) -> usize {
        self.spaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spaces.is_empty()
    }

    pub fn spaces(&self) -> &[Space] {
        &self.spaces
    }
}
