//! The game engine: the heart of Cashflow.
//!
//! TURN ORDER (fixed):
//!   1. Roll the die (dice stream).
//!   2. Move `roll` spaces, wrapping around the board.
//!   3. Resolve the landed space:
//!        payday      → salary + passive - expenses (cash may go negative)
//!        opportunity → draw a card (card stream), resolve it immediately
//!        doodad      → random cost (doodad stream), cash clamped at 0
//!        market      → passive income swings ± market_swing (market stream)
//!   4. Advance the turn counter.
//!
//! RULES:
//!   - Every validation happens before any mutation.
//!   - The fast-track flag is recomputed after anything that touches
//!     passive income or expenses.
//!   - All randomness flows through the RngBank.
//!   - Every state change is recorded as a GameEvent.

use crate::{
    board::{Space, SpaceKind},
    catalog::{round_half_up, CardEffect, OpportunityCard},
    command::{CommandOutcome, Payday, PlayerCommand, Purchase, Sale, TurnReport},
    config::GameConfig,
    error::{GameError, GameResult},
    event::GameEvent,
    player::PlayerState,
    rng::{RandomSlot, RngBank},
};

pub struct GameEngine {
    config:  GameConfig,
    state:   PlayerState,
    rng:     RngBank,
    /// Events emitted since the last take_events().
    pending: Vec<GameEvent>,
}

impl GameEngine {
    /// Fails with InvalidConfig if `config` does not validate.
    pub fn new(config: GameConfig, rng: RngBank) -> GameResult<Self> {
        Self::with_state(config, PlayerState::default(), rng)
    }

    /// Resume from an existing state. The state must already be valid for
    /// this config (snapshot::parse_snapshot guarantees that).
    pub fn with_state(config: GameConfig, state: PlayerState, rng: RngBank) -> GameResult<Self> {
        config.validate()?;
        Ok(Self::assemble(config, state, rng))
    }

    /// Standard content, every random stream seeded from `seed`.
    pub fn seeded(seed: u64) -> Self {
        // GameConfig::standard() always validates.
        Self::assemble(GameConfig::standard(), PlayerState::default(), RngBank::seeded(seed))
    }

    fn assemble(config: GameConfig, state: PlayerState, rng: RngBank) -> Self {
        Self { config, state, rng, pending: Vec::new() }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    /// A read-only copy for drivers.
    pub fn snapshot(&self) -> PlayerState {
        self.state.clone()
    }

    /// Drain every event emitted since the last call.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending)
    }

    // ── Movement ───────────────────────────────────────────────

    /// Uniform in [1, die_faces].
    pub fn roll_dice(&mut self) -> u64 {
        let faces = self.config.rules.die_faces;
        self.rng.source(RandomSlot::Dice).below(faces) + 1
    }

    /// One full turn: roll, move, resolve the landing, bump the turn.
    pub fn roll_and_advance(&mut self) -> GameResult<TurnReport> {
        let mark = self.pending.len();

        let roll = self.roll_dice();
        self.emit(GameEvent::DiceRolled { turn: self.state.turn, roll });
        self.advance(roll as usize)?;
        self.state.turn = self.state.turn.saturating_add(1);

        let events = self.pending[mark..].to_vec();
        let messages = events.iter().map(GameEvent::message).collect();
        Ok(TurnReport {
            roll,
            new_position: self.state.position,
            events,
            messages,
        })
    }

    /// Move `steps` spaces and resolve the space landed on.
    /// Returns the events the move triggered.
    pub fn advance(&mut self, steps: usize) -> GameResult<Vec<GameEvent>> {
        let mark = self.pending.len();

        let from = self.state.position;
        let to = self.config.board.wrap(from, steps);
        let space = self.config.board.space_at(to)?.clone();
        self.state.position = to;
        self.emit(GameEvent::Moved { from, to, label: space.label.clone() });

        self.apply_landing(&space)?;
        Ok(self.pending[mark..].to_vec())
    }

    pub fn apply_landing(&mut self, space: &Space) -> GameResult<()> {
        match space.kind {
            SpaceKind::Payday => {
                self.apply_payday();
            }
            SpaceKind::Opportunity => {
                self.draw_card()?;
            }
            SpaceKind::Doodad => self.apply_doodad(),
            SpaceKind::Market => self.apply_market(),
        }
        Ok(())
    }

    // ── Space effects ──────────────────────────────────────────

    /// Collect salary and passive income, pay expenses. Cash is NOT
    /// clamped here: a negative balance is the player's warning sign.
    /// Balances saturate at the i64 limits.
    pub fn apply_payday(&mut self) -> Payday {
        let income = self.state.income();
        let expenses = self.state.expenses;
        self.state.cash = self.state.cash.saturating_add(self.state.cashflow());
        let new_cash = self.state.cash;

        self.emit(GameEvent::PaydayCollected { income, expenses, new_cash });
        self.check_fast_track();
        Payday { income, new_cash }
    }

    fn apply_doodad(&mut self) {
        let rules = &self.config.rules;
        let (min, span) = (rules.doodad_min, rules.doodad_span);
        let cost = min.saturating_add(self.rng.source(RandomSlot::Doodad).below(span) as i64);
        self.state.charge_clamped(cost);
        self.emit(GameEvent::DoodadCharged { cost, new_cash: self.state.cash });
    }

    fn apply_market(&mut self) {
        let swing = self.config.rules.market_swing;
        let r = self.rng.source(RandomSlot::Market).next_f64();
        let factor = r * 2.0 * swing - swing;
        let delta = round_half_up(self.state.passive_income as f64 * factor);

        self.state.passive_income = self.state.passive_income.saturating_add(delta).max(0);
        self.emit(GameEvent::MarketShifted {
            delta,
            new_passive: self.state.passive_income,
        });
        self.check_fast_track();
    }

    /// Draw uniformly from the deck and resolve the card on the spot.
    /// An asset card the player cannot afford is declined, not deferred.
    pub fn draw_card(&mut self) -> GameResult<OpportunityCard> {
        let len = self.config.deck.len();
        let index = self.rng.source(RandomSlot::Card).below(len as u64) as usize;
        let card = self
            .config
            .deck
            .get(index)
            .cloned()
            .ok_or(GameError::IndexOutOfRange { index, len })?;
        self.emit(GameEvent::CardDrawn { card_id: card.id, text: card.text.clone() });

        match &card.effect {
            CardEffect::GrantAsset { asset_id } => self.offer_asset(asset_id),
            CardEffect::GrantCash { amount } => {
                self.state.cash = self.state.cash.saturating_add(*amount);
                self.emit(GameEvent::CashGranted { amount: *amount, new_cash: self.state.cash });
            }
            CardEffect::ChargeExpense { amount } => {
                self.state.charge_clamped(*amount);
                self.emit(GameEvent::ExpenseCharged { amount: *amount, new_cash: self.state.cash });
            }
        }
        Ok(card)
    }

    fn offer_asset(&mut self, asset_id: &str) {
        let Some(asset) = self.config.catalog.get(asset_id).cloned() else {
            log::warn!("card offers unknown asset '{asset_id}', ignoring");
            return;
        };
        if self.state.cash >= asset.cost {
            if let Err(e) = self.buy_asset(&asset.id) {
                log::warn!("card purchase of '{}' failed: {e}", asset.id);
            }
        } else {
            log::warn!(
                "turn={} declined {}: cost {} > cash {}",
                self.state.turn, asset.id, asset.cost, self.state.cash
            );
            self.emit(GameEvent::PurchaseDeclined {
                asset_id: asset.id,
                name:     asset.name,
                cost:     asset.cost,
                cash:     self.state.cash,
            });
        }
    }

    // ── Portfolio ──────────────────────────────────────────────

    pub fn buy_asset(&mut self, asset_id: &str) -> GameResult<Purchase> {
        let asset = self.config.catalog.lookup(asset_id)?.clone();
        if self.state.cash < asset.cost {
            return Err(GameError::InsufficientFunds {
                asset_id: asset.id,
                name:     asset.name,
                cost:     asset.cost,
                cash:     self.state.cash,
            });
        }

        self.state.cash -= asset.cost;
        self.state.passive_income = self.state.passive_income.saturating_add(asset.passive_income);
        self.state.owned_assets.push(asset.id.clone());

        log::info!(
            "turn={} bought {} for {} (passive now {})",
            self.state.turn, asset.id, asset.cost, self.state.passive_income
        );
        self.emit(GameEvent::AssetPurchased {
            asset_id:       asset.id.clone(),
            name:           asset.name,
            cost:           asset.cost,
            passive_income: asset.passive_income,
        });
        self.check_fast_track();

        Ok(Purchase {
            asset_id:       asset.id,
            cost:           asset.cost,
            passive_income: asset.passive_income,
        })
    }

    /// Sell the holding at `index` back at resale_ratio of its cost.
    pub fn sell_asset(&mut self, index: usize) -> GameResult<Sale> {
        let len = self.state.owned_assets.len();
        let asset_id = self
            .state
            .owned_assets
            .get(index)
            .ok_or(GameError::IndexOutOfRange { index, len })?;
        let asset = self.config.catalog.lookup(asset_id)?.clone();
        let recovered = asset.resale_value(self.config.rules.resale_ratio);

        self.state.owned_assets.remove(index);
        self.state.passive_income = (self.state.passive_income - asset.passive_income).max(0);
        self.state.cash = self.state.cash.saturating_add(recovered);

        log::info!(
            "turn={} sold {} for {} (passive now {})",
            self.state.turn, asset.id, recovered, self.state.passive_income
        );
        self.emit(GameEvent::AssetSold {
            index,
            asset_id: asset.id.clone(),
            name:     asset.name,
            recovered,
        });
        self.check_fast_track();

        Ok(Sale { asset_id: asset.id, recovered })
    }

    // ── Lifecycle ──────────────────────────────────────────────

    pub fn reset(&mut self) {
        self.state = PlayerState::default();
        log::info!("game reset to starting state");
        self.emit(GameEvent::GameReset);
    }

    /// Recompute the fast-track flag, emitting an event when it flips.
    pub fn check_fast_track(&mut self) -> bool {
        if self.state.check_fast_track() {
            self.emit(GameEvent::FastTrackChanged { in_fast_track: self.state.in_fast_track });
        }
        self.state.in_fast_track
    }

    /// Dispatch a driver command. Rule violations come back as Err with
    /// the state untouched.
    pub fn apply_command(&mut self, command: PlayerCommand) -> GameResult<CommandOutcome> {
        let mark = self.pending.len();

        match command {
            PlayerCommand::Roll => {
                self.roll_and_advance()?;
            }
            PlayerCommand::Payday => {
                self.apply_payday();
            }
            PlayerCommand::BuyAsset { asset_id } => {
                self.buy_asset(&asset_id)?;
            }
            PlayerCommand::SellAsset { index } => {
                self.sell_asset(index)?;
            }
            PlayerCommand::Reset => self.reset(),
        }

        let events = self.pending[mark..].to_vec();
        let messages = events.iter().map(GameEvent::message).collect();
        Ok(CommandOutcome { events, messages, state: self.snapshot() })
    }

    fn emit(&mut self, event: GameEvent) {
        log::debug!("turn={} {}", self.state.turn, event.message());
        self.pending.push(event);
    }
}
