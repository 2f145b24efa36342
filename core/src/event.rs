//! Everything the engine reports back to its driver.
//!
//! RULE: Every state change emits exactly one event describing it.
//! Drivers render events via message(); the session persists them.

use crate::types::{AssetId, CardId, GameId, Money, Position, Turn};
use serde::{Deserialize, Serialize};

/// Variants are appended as features land; never removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    // ── Movement ───────────────────────────────────
    DiceRolled {
        turn: Turn,
        roll: u64,
    },
    Moved {
        from:  Position,
        to:    Position,
        label: String,
    },

    // ── Space effects ──────────────────────────────
    PaydayCollected {
        income:   Money,
        expenses: Money,
        new_cash: Money,
    },
    DoodadCharged {
        cost:     Money,
        new_cash: Money,
    },
    MarketShifted {
        delta:       Money,
        new_passive: Money,
    },

    // ── Opportunity cards ──────────────────────────
    CardDrawn {
        card_id: CardId,
        text:    String,
    },
    PurchaseDeclined {
        asset_id: AssetId,
        name:     String,
        cost:     Money,
        cash:     Money,
    },
    CashGranted {
        amount:   Money,
        new_cash: Money,
    },
    ExpenseCharged {
        amount:   Money,
        new_cash: Money,
    },

    // ── Portfolio ──────────────────────────────────
    AssetPurchased {
        asset_id:       AssetId,
        name:           String,
        cost:           Money,
        passive_income: Money,
    },
    AssetSold {
        index:     usize,
        asset_id:  AssetId,
        name:      String,
        recovered: Money,
    },
    FastTrackChanged {
        in_fast_track: bool,
    },

    // ── Lifecycle ──────────────────────────────────
    GameReset,
}

impl GameEvent {
    /// Stable name used for the event_type column in event_log.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::DiceRolled { .. }       => "dice_rolled",
            Self::Moved { .. }            => "moved",
            Self::PaydayCollected { .. }  => "payday_collected",
            Self::DoodadCharged { .. }    => "doodad_charged",
            Self::MarketShifted { .. }    => "market_shifted",
            Self::CardDrawn { .. }        => "card_drawn",
            Self::PurchaseDeclined { .. } => "purchase_declined",
            Self::CashGranted { .. }      => "cash_granted",
            Self::ExpenseCharged { .. }   => "expense_charged",
            Self::AssetPurchased { .. }   => "asset_purchased",
            Self::AssetSold { .. }        => "asset_sold",
            Self::FastTrackChanged { .. } => "fast_track_changed",
            Self::GameReset               => "game_reset",
        }
    }

    /// Plain-text line for the message panel.
    pub fn message(&self) -> String {
        match self {
            Self::DiceRolled { roll, .. } => format!("Rolled a {roll}"),
            Self::Moved { to, label, .. } => format!("Moved to #{to} ({label})"),
            Self::PaydayCollected { income, expenses, new_cash } => {
                format!("Payday! +{income} - {expenses} expenses => cash {new_cash}")
            }
            Self::DoodadCharged { cost, .. } => format!("Doodad expense: -{cost}"),
            Self::MarketShifted { delta, .. } => {
                format!("Market swing: passive income {delta:+}")
            }
            Self::CardDrawn { text, .. } => format!("Card: {text}"),
            Self::PurchaseDeclined { name, cost, .. } => {
                format!("Opportunity: {name} costs ${cost}, not enough cash.")
            }
            Self::CashGranted { amount, .. } => format!("Windfall: +{amount} cash"),
            Self::ExpenseCharged { amount, .. } => format!("Forced expense: -{amount}"),
            Self::AssetPurchased { name, cost, passive_income, .. } => {
                format!("Bought {name} for {cost}. Passive income +{passive_income}")
            }
            Self::AssetSold { name, recovered, .. } => {
                format!("Sold {name}, recovered {recovered}")
            }
            Self::FastTrackChanged { in_fast_track: true } => {
                "Passive income now covers expenses: welcome to the fast track!".into()
            }
            Self::FastTrackChanged { in_fast_track: false } => {
                "Passive income no longer covers expenses: back in the rat race.".into()
            }
            Self::GameReset => "Game reset. Good luck!".into(),
        }
    }
}

/// The event log entry as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id:         Option<i64>,
    pub game_id:    GameId,
    pub turn:       Turn,
    pub event_type: String,
    pub payload:    String, // JSON-serialized GameEvent
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_snake_case_tag() {
        let event = GameEvent::DoodadCharged { cost: 450, new_cash: 4550 };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"type":"doodad_charged","cost":450,"new_cash":4550}"#);
        assert_eq!(event.type_name(), "doodad_charged");
    }

    #[test]
    fn market_message_shows_sign() {
        let up = GameEvent::MarketShifted { delta: 12, new_passive: 132 };
        let down = GameEvent::MarketShifted { delta: -12, new_passive: 108 };
        assert_eq!(up.message(), "Market swing: passive income +12");
        assert_eq!(down.message(), "Market swing: passive income -12");
    }
}
