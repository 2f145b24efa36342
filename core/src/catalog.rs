//! Asset catalog and the opportunity deck: immutable game content.

use crate::{
    error::{GameError, GameResult},
    types::{AssetId, CardId, Money},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Asset {
    pub id:             AssetId,
    pub name:           String,
    pub cost:           Money,
    #[serde(rename = "passive")]
    pub passive_income: Money,
}

impl Asset {
    pub fn new(id: &str, name: &str, cost: Money, passive_income: Money) -> Self {
        Self { id: id.into(), name: name.into(), cost, passive_income }
    }

    /// Cash returned when the asset is sold back, rounded half-up.
    pub fn resale_value(&self, resale_ratio: f64) -> Money {
        round_half_up(self.cost as f64 * resale_ratio)
    }
}

/// Round to the nearest whole dollar, ties toward positive infinity.
pub fn round_half_up(value: f64) -> Money {
    (value + 0.5).floor() as Money
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct AssetCatalog {
    assets: Vec<Asset>,
}

impl AssetCatalog {
    pub fn new(assets: Vec<Asset>) -> GameResult<Self> {
        let catalog = Self { assets };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn standard() -> Self {
        Self {
            assets: vec![
                Asset::new("small-rental",  "Small Rental",     3000, 300),
                Asset::new("index-etf",     "Global Index ETF", 2000, 120),
                Asset::new("side-business", "Side Business",    5000, 600),
            ],
        }
    }

    pub fn validate(&self) -> GameResult<()> {
        for (i, asset) in self.assets.iter().enumerate() {
            if asset.cost <= 0 || asset.passive_income <= 0 {
                return Err(GameError::InvalidConfig {
                    reason: format!("asset '{}' needs positive cost and passive income", asset.id),
                });
            }
            if self.assets[..i].iter().any(|a| a.id == asset.id) {
                return Err(GameError::InvalidConfig {
                    reason: format!("duplicate asset id '{}'", asset.id),
                });
            }
        }
        Ok(())
    }

    pub fn get(&self, asset_id: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == asset_id)
    }

    pub fn lookup(&self, asset_id: &str) -> GameResult<&Asset> {
        self.get(asset_id).ok_or_else(|| GameError::UnknownAsset { asset_id: asset_id.into() })
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CardEffect {
    #[serde(rename = "asset")]
    GrantAsset {
        #[serde(rename = "assetId")]
        asset_id: AssetId,
    },
    #[serde(rename = "cash")]
    GrantCash { amount: Money },
    #[serde(rename = "expense")]
    ChargeExpense { amount: Money },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OpportunityCard {
    pub id:     CardId,
    pub text:   String,
    #[serde(flatten)]
    pub effect: CardEffect,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Deck {
    cards: Vec<OpportunityCard>,
}

impl Deck {
    pub fn new(cards: Vec<OpportunityCard>, catalog: &AssetCatalog) -> GameResult<Self> {
        let deck = Self { cards };
        deck.validate(catalog)?;
        Ok(deck)
    }

    pub fn standard() -> Self {
        let card = |id, text: &str, effect| OpportunityCard { id, text: text.into(), effect };
        Self {
            cards: vec![
                card(1, "Buy a small rental",     CardEffect::GrantAsset { asset_id: "small-rental".into() }),
                card(2, "Buy a global index ETF", CardEffect::GrantAsset { asset_id: "index-etf".into() }),
                card(3, "Start a side business",  CardEffect::GrantAsset { asset_id: "side-business".into() }),
                card(4, "Small lottery win",      CardEffect::GrantCash { amount: 1000 }),
                card(5, "Major repair",           CardEffect::ChargeExpense { amount: 800 }),
            ],
        }
    }

    /// Every card must name a real asset or carry a positive amount.
    pub fn validate(&self, catalog: &AssetCatalog) -> GameResult<()> {
        if self.cards.is_empty() {
            return Err(GameError::InvalidConfig { reason: "opportunity deck is empty".into() });
        }
        for card in &self.cards {
            match &card.effect {
                CardEffect::GrantAsset { asset_id } => {
                    if catalog.get(asset_id).is_none() {
                        return Err(GameError::InvalidConfig {
                            reason: format!("card {} grants unknown asset '{asset_id}'", card.id),
                        });
                    }
                }
                CardEffect::GrantCash { amount } | CardEffect::ChargeExpense { amount } => {
                    if *amount <= 0 {
                        return Err(GameError::InvalidConfig {
                            reason: format!("card {} has non-positive amount {amount}", card.id),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&OpportunityCard> {
        self.cards.get(index)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[OpportunityCard] {
        &self.cards
    }
}
