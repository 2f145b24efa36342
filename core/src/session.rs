//! A game bound to a save slot.
//!
//! The session is the only place engine state meets the store:
//! it restores the slot on open, and after every driver action it
//! appends the emitted events to the log and rewrites the slot.

use crate::{
    command::{CommandOutcome, Payday, PlayerCommand, Purchase, Sale, TurnReport},
    config::GameConfig,
    engine::GameEngine,
    error::GameResult,
    event::EventLogEntry,
    player::PlayerState,
    rng::RngBank,
    snapshot::{load_snapshot, serialize_snapshot},
    store::SaveStore,
    types::{GameId, Turn},
};

pub const DEFAULT_SAVE_KEY: &str = "cashflow_player_v1";

pub struct GameSession {
    pub game_id: GameId,
    save_key:    String,
    engine:      GameEngine,
    store:       SaveStore,
}

impl GameSession {
    /// Restore the game saved under `save_key`, or start fresh if the
    /// slot is empty or unreadable.
    pub fn open(
        game_id:  GameId,
        save_key: &str,
        config:   GameConfig,
        rng:      RngBank,
        store:    SaveStore,
    ) -> GameResult<Self> {
        let blob = store.load_blob(save_key)?;
        let resumed = blob.is_some();
        let state = load_snapshot(blob.as_deref(), &config);
        log::info!(
            "game {game_id}: {} slot '{save_key}' at turn {}",
            if resumed { "opened" } else { "created" },
            state.turn
        );

        let session = Self {
            game_id,
            save_key: save_key.to_string(),
            engine: GameEngine::with_state(config, state, rng)?,
            store,
        };
        session.save()?;
        Ok(session)
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub fn state(&self) -> &PlayerState {
        self.engine.state()
    }

    pub fn store(&self) -> &SaveStore {
        &self.store
    }

    pub fn into_store(self) -> SaveStore {
        self.store
    }

    pub fn execute(&mut self, command: PlayerCommand) -> GameResult<CommandOutcome> {
        let turn = self.engine.state().turn;
        let outcome = self.engine.apply_command(command);
        self.flush(turn)?;
        outcome
    }

    pub fn roll_and_advance(&mut self) -> GameResult<TurnReport> {
        let turn = self.engine.state().turn;
        let report = self.engine.roll_and_advance();
        self.flush(turn)?;
        report
    }

    pub fn apply_payday(&mut self) -> GameResult<Payday> {
        let turn = self.engine.state().turn;
        let payday = self.engine.apply_payday();
        self.flush(turn)?;
        Ok(payday)
    }

    pub fn buy_asset(&mut self, asset_id: &str) -> GameResult<Purchase> {
        let turn = self.engine.state().turn;
        let purchase = self.engine.buy_asset(asset_id);
        self.flush(turn)?;
        purchase
    }

    pub fn sell_asset(&mut self, index: usize) -> GameResult<Sale> {
        let turn = self.engine.state().turn;
        let sale = self.engine.sell_asset(index);
        self.flush(turn)?;
        sale
    }

    /// Wipe the slot and start over from the defaults.
    pub fn reset(&mut self) -> GameResult<()> {
        let turn = self.engine.state().turn;
        self.store.delete_blob(&self.save_key)?;
        self.engine.reset();
        self.flush(turn)
    }

    /// Write the current state to the save slot.
    pub fn save(&self) -> GameResult<()> {
        let blob = serialize_snapshot(self.engine.state())?;
        self.store.save_blob(&self.save_key, &blob)
    }

    fn flush(&mut self, turn: Turn) -> GameResult<()> {
        for event in self.engine.take_events() {
            let entry = EventLogEntry {
                id:         None,
                game_id:    self.game_id.clone(),
                turn,
                event_type: event.type_name().to_string(),
                payload:    serde_json::to_string(&event)?,
            };
            self.store.append_event(&entry)?;
        }
        self.save()
    }
}
