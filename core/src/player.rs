//! The single mutable aggregate: one player's finances and position.

use crate::types::{AssetId, Money, Position, Turn};
use serde::{Deserialize, Serialize};

pub const STARTING_CASH: Money = 5000;
pub const STARTING_SALARY: Money = 2000;
pub const STARTING_EXPENSES: Money = 1500;

/// Field names match the save format, so a snapshot is this struct
/// serialized flat. Missing fields fall back to the starting values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PlayerState {
    pub cash:           Money,
    pub salary:         Money,
    pub expenses:       Money,
    #[serde(rename = "passive")]
    pub passive_income: Money,
    pub position:       Position,
    /// One entry per purchase; duplicates allowed.
    #[serde(rename = "assets")]
    pub owned_assets:   Vec<AssetId>,
    pub turn:           Turn,
    #[serde(rename = "inFastTrack")]
    pub in_fast_track:  bool,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            cash:           STARTING_CASH,
            salary:         STARTING_SALARY,
            expenses:       STARTING_EXPENSES,
            passive_income: 0,
            position:       0,
            owned_assets:   Vec::new(),
            turn:           1,
            in_fast_track:  false,
        }
    }
}

impl PlayerState {
    /// Salary plus passive income, before expenses.
    pub fn income(&self) -> Money {
        self.salary.saturating_add(self.passive_income)
    }

    /// Net change a payday would apply right now.
    pub fn cashflow(&self) -> Money {
        self.income().saturating_sub(self.expenses)
    }

    /// Recompute the fast-track flag. Returns true if it flipped.
    pub fn check_fast_track(&mut self) -> bool {
        let next = self.passive_income > self.expenses;
        let flipped = next != self.in_fast_track;
        self.in_fast_track = next;
        flipped
    }

    /// Deduct without letting cash drop below zero.
    /// Returns the amount actually removed.
    pub fn charge_clamped(&mut self, amount: Money) -> Money {
        let before = self.cash;
        self.cash = self.cash.saturating_sub(amount).max(0);
        before - self.cash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_starting_position() {
        let p = PlayerState::default();
        assert_eq!(p.cash, 5000);
        assert_eq!(p.salary, 2000);
        assert_eq!(p.expenses, 1500);
        assert_eq!(p.passive_income, 0);
        assert_eq!(p.turn, 1);
        assert!(p.owned_assets.is_empty());
        assert!(!p.in_fast_track);
        assert_eq!(p.cashflow(), 500);
    }

    #[test]
    fn fast_track_needs_strictly_greater_passive() {
        let mut p = PlayerState { passive_income: 1500, ..PlayerState::default() };
        assert!(!p.check_fast_track());
        assert!(!p.in_fast_track);

        p.passive_income = 1501;
        assert!(p.check_fast_track());
        assert!(p.in_fast_track);
    }

    #[test]
    fn clamped_charge_never_goes_negative() {
        let mut p = PlayerState { cash: 300, ..PlayerState::default() };
        assert_eq!(p.charge_clamped(800), 300);
        assert_eq!(p.cash, 0);
    }

    #[test]
    fn extreme_balances_saturate() {
        let p = PlayerState {
            salary:         Money::MAX,
            passive_income: 10,
            expenses:       0,
            ..PlayerState::default()
        };
        assert_eq!(p.income(), Money::MAX);
        assert_eq!(p.cashflow(), Money::MAX);

        let mut p = PlayerState { cash: Money::MIN, ..PlayerState::default() };
        p.charge_clamped(1);
        assert_eq!(p.cash, 0);
    }
}
