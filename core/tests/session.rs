//! Save-slot persistence and the event log.

use cashflow_core::{
    command::PlayerCommand,
    config::GameConfig,
    error::GameError,
    player::PlayerState,
    rng::{RandomSlot, RngBank, ScriptedSource},
    session::{GameSession, DEFAULT_SAVE_KEY},
    store::SaveStore,
};

fn fresh_store() -> SaveStore {
    let store = SaveStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store
}

fn open(store: SaveStore, seed: u64) -> GameSession {
    GameSession::open(
        format!("session-test-{seed}"),
        DEFAULT_SAVE_KEY,
        GameConfig::standard(),
        RngBank::seeded(seed),
        store,
    )
    .expect("open session")
}

#[test]
fn new_slot_starts_at_defaults_and_is_written() {
    let session = open(fresh_store(), 1);
    assert_eq!(*session.state(), PlayerState::default());
    assert!(session.store().load_blob(DEFAULT_SAVE_KEY).unwrap().is_some());
}

#[test]
fn progress_survives_reopening() {
    let mut session = open(fresh_store(), 2);
    session.buy_asset("small-rental").unwrap();
    session.apply_payday().unwrap();
    let saved = session.state().clone();

    let reopened = open(session.into_store(), 3);
    assert_eq!(*reopened.state(), saved);
    assert_eq!(reopened.state().cash, 2800);
}

#[test]
fn corrupt_slot_starts_fresh_and_is_overwritten() {
    let store = fresh_store();
    store.save_blob(DEFAULT_SAVE_KEY, "{{{ definitely not json").unwrap();

    let session = open(store, 4);
    assert_eq!(*session.state(), PlayerState::default());

    let blob = session.store().load_blob(DEFAULT_SAVE_KEY).unwrap().unwrap();
    assert!(blob.contains("\"cash\":5000"), "slot should hold defaults: {blob}");
}

#[test]
fn turn_events_are_logged_under_the_rolling_turn() {
    let dice = ScriptedSource::choosing(&[4], 6); // roll 5 → payday
    let bank = RngBank::seeded(5).with_source(RandomSlot::Dice, Box::new(dice));
    let mut session = GameSession::open(
        "log-test".into(),
        DEFAULT_SAVE_KEY,
        GameConfig::standard(),
        bank,
        fresh_store(),
    )
    .unwrap();

    session.roll_and_advance().unwrap();

    let entries = session.store().events_for_turn("log-test", 1).unwrap();
    let types: Vec<&str> = entries.iter().map(|e| e.event_type.as_str()).collect();
    assert_eq!(types, vec!["dice_rolled", "moved", "payday_collected"]);
    assert!(entries[2].payload.contains("\"new_cash\":5500"));
    assert_eq!(session.state().turn, 2);
}

#[test]
fn rejected_command_logs_nothing_and_keeps_state() {
    let mut session = open(fresh_store(), 6);
    let before = session.state().clone();

    let err = session
        .execute(PlayerCommand::SellAsset { index: 3 })
        .unwrap_err();
    assert!(matches!(err, GameError::IndexOutOfRange { index: 3, len: 0 }));
    assert_eq!(err.to_string(), "Index 3 out of range (length 0)");

    assert_eq!(*session.state(), before);
    assert_eq!(session.store().event_count(&session.game_id).unwrap(), 0);
}

#[test]
fn commands_return_messages_and_state() {
    let mut session = open(fresh_store(), 7);
    let outcome = session
        .execute(PlayerCommand::BuyAsset { asset_id: "index-etf".into() })
        .unwrap();

    assert_eq!(outcome.messages, vec!["Bought Global Index ETF for 2000. Passive income +120"]);
    assert_eq!(outcome.state.cash, 3000);
}

#[test]
fn roll_command_plays_a_turn() {
    let dice = ScriptedSource::choosing(&[4], 6); // roll 5 → payday
    let bank = RngBank::seeded(11).with_source(RandomSlot::Dice, Box::new(dice));
    let mut session = GameSession::open(
        "roll-cmd".into(),
        DEFAULT_SAVE_KEY,
        GameConfig::standard(),
        bank,
        fresh_store(),
    )
    .unwrap();

    let outcome = session.execute(PlayerCommand::Roll).unwrap();
    assert_eq!(
        outcome.messages,
        vec![
            "Rolled a 5",
            "Moved to #5 (Payday)",
            "Payday! +2000 - 1500 expenses => cash 5500",
        ]
    );
    assert_eq!(outcome.state.position, 5);
    assert_eq!(outcome.state.cash, 5500);
    assert_eq!(outcome.state.turn, 2);
    assert_eq!(outcome.state, *session.state());
}

#[test]
fn payday_command_collects_without_moving() {
    let mut session = open(fresh_store(), 12);
    let outcome = session.execute(PlayerCommand::Payday).unwrap();

    assert_eq!(outcome.messages, vec!["Payday! +2000 - 1500 expenses => cash 5500"]);
    assert_eq!(outcome.state.cash, 5500);
    assert_eq!(outcome.state.position, 0);
    assert_eq!(outcome.state.turn, 1);
}

#[test]
fn reset_command_restores_defaults() {
    let mut session = open(fresh_store(), 13);
    session.buy_asset("small-rental").unwrap();

    let outcome = session.execute(PlayerCommand::Reset).unwrap();
    assert_eq!(outcome.messages, vec!["Game reset. Good luck!"]);
    assert_eq!(outcome.state, PlayerState::default());
    assert_eq!(*session.state(), PlayerState::default());
}

#[test]
fn reset_wipes_the_slot_back_to_defaults() {
    let mut session = open(fresh_store(), 8);
    session.buy_asset("side-business").unwrap();
    session.reset().unwrap();
    assert_eq!(*session.state(), PlayerState::default());

    let reopened = open(session.into_store(), 9);
    assert_eq!(*reopened.state(), PlayerState::default());
}

#[test]
fn separate_slots_do_not_interfere() {
    let store = fresh_store();
    store.save_blob("other-player", r#"{"cash": 42}"#).unwrap();

    let mut session = open(store, 10);
    session.buy_asset("index-etf").unwrap();

    assert_eq!(
        session.store().load_blob("other-player").unwrap().as_deref(),
        Some(r#"{"cash": 42}"#)
    );
}
