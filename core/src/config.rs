//! Game content and rule tuning.
//!
//! Content (board, assets, cards) is immutable once the engine is built.
//! In tests, use GameConfig::standard().

use crate::{
    board::{Board, Space},
    catalog::{Asset, AssetCatalog, Deck, OpportunityCard},
    error::{GameError, GameResult},
    types::Money,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Numeric knobs for the space effects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RuleConfig {
    pub die_faces:    u64,
    /// Cheapest possible doodad.
    pub doodad_min:   Money,
    /// Doodad costs land in [doodad_min, doodad_min + doodad_span).
    pub doodad_span:  u64,
    /// Market moves passive income by up to ± this fraction.
    pub market_swing: f64,
    pub resale_ratio: f64,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            die_faces:    6,
            doodad_min:   200,
            doodad_span:  800,
            market_swing: 0.1,
            resale_ratio: 0.8,
        }
    }
}

impl RuleConfig {
    pub fn validate(&self) -> GameResult<()> {
        let reason = if self.die_faces == 0 {
            Some("die_faces must be > 0")
        } else if self.doodad_span == 0 {
            Some("doodad_span must be > 0")
        } else if self.doodad_min < 0 {
            Some("doodad_min must be >= 0")
        } else if !(0.0..=1.0).contains(&self.market_swing) {
            Some("market_swing must lie in [0, 1]")
        } else if !(0.0..=1.0).contains(&self.resale_ratio) {
            Some("resale_ratio must lie in [0, 1]")
        } else {
            None
        };
        match reason {
            Some(r) => Err(GameError::InvalidConfig { reason: r.into() }),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GameConfig {
    pub board:   Board,
    pub catalog: AssetCatalog,
    pub deck:    Deck,
    pub rules:   RuleConfig,
}

impl GameConfig {
    /// The built-in board, catalog and deck.
    pub fn standard() -> Self {
        Self {
            board:   Board::standard(),
            catalog: AssetCatalog::standard(),
            deck:    Deck::standard(),
            rules:   RuleConfig::default(),
        }
    }

    /// Load from a data directory holding board.json, assets.json,
    /// cards.json and (optionally) rules.json.
    pub fn load(data_dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let dir = data_dir.as_ref();

        let spaces: Vec<Space> = read_json(&dir.join("board.json"))?;
        let assets: Vec<Asset> = read_json(&dir.join("assets.json"))?;
        let cards: Vec<OpportunityCard> = read_json(&dir.join("cards.json"))?;

        let rules_path = dir.join("rules.json");
        let rules: RuleConfig = if rules_path.exists() {
            read_json(&rules_path)?
        } else {
            RuleConfig::default()
        };

        let board = Board::new(spaces)?;
        let catalog = AssetCatalog::new(assets)?;
        let deck = Deck::new(cards, &catalog)?;
        let config = Self { board, catalog, deck, rules };
        config.validate()?;

        log::info!(
            "Loaded game config from {}: {} spaces, {} assets, {} cards",
            dir.display(),
            config.board.len(),
            config.catalog.assets().len(),
            config.deck.len()
        );
        Ok(config)
    }

    pub fn validate(&self) -> GameResult<()> {
        self.board.validate()?;
        self.catalog.validate()?;
        self.deck.validate(&self.catalog)?;
        self.rules.validate()
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
    let value = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Cannot parse {}: {e}", path.display()))?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_config_is_valid() {
        assert!(GameConfig::standard().validate().is_ok());
    }

    #[test]
    fn partial_rules_fill_in_defaults() {
        let rules: RuleConfig = serde_json::from_str(r#"{"resale_ratio": 0.5}"#).unwrap();
        assert_eq!(rules.resale_ratio, 0.5);
        assert_eq!(rules.die_faces, 6);
        assert_eq!(rules.doodad_min, 200);
    }

    #[test]
    fn bad_rules_rejected() {
        let rules = RuleConfig { die_faces: 0, ..RuleConfig::default() };
        assert!(rules.validate().is_err());
        let rules = RuleConfig { resale_ratio: 1.5, ..RuleConfig::default() };
        assert!(rules.validate().is_err());
    }
}
