//! Loading game content from the data/ directory.

use cashflow_core::{
    board::SpaceKind,
    catalog::{CardEffect, Deck},
    config::{GameConfig, RuleConfig},
    engine::GameEngine,
    error::GameError,
    rng::RngBank,
    session::GameSession,
    store::SaveStore,
};
use std::path::PathBuf;

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../data")
}

#[test]
fn shipped_data_matches_built_in_content() {
    let loaded = GameConfig::load(data_dir()).expect("load data/");
    let standard = GameConfig::standard();

    assert_eq!(loaded.board, standard.board);
    assert_eq!(loaded.catalog, standard.catalog);
    assert_eq!(loaded.deck, standard.deck);
    assert_eq!(loaded.rules, standard.rules);
}

#[test]
fn shipped_board_and_deck_shape() {
    let config = GameConfig::load(data_dir()).expect("load data/");

    let paydays = config
        .board
        .spaces()
        .iter()
        .filter(|s| s.kind == SpaceKind::Payday)
        .count();
    assert_eq!(paydays, 2);

    let asset_cards = config
        .deck
        .cards()
        .iter()
        .filter(|c| matches!(c.effect, CardEffect::GrantAsset { .. }))
        .count();
    assert_eq!(asset_cards, 3);
}

#[test]
fn missing_directory_is_an_error() {
    let err = GameConfig::load(data_dir().join("does-not-exist")).unwrap_err();
    assert!(err.to_string().contains("Cannot read"), "{err}");
}

#[test]
fn engine_refuses_a_zero_sided_die() {
    let config = GameConfig {
        rules: RuleConfig { die_faces: 0, ..RuleConfig::default() },
        ..GameConfig::standard()
    };
    let result = GameEngine::new(config, RngBank::seeded(1));
    assert!(matches!(result, Err(GameError::InvalidConfig { .. })));
}

#[test]
fn engine_refuses_an_empty_deck() {
    let deck: Deck = serde_json::from_str("[]").unwrap();
    let config = GameConfig { deck, ..GameConfig::standard() };
    assert!(matches!(
        GameEngine::new(config.clone(), RngBank::seeded(2)),
        Err(GameError::InvalidConfig { .. })
    ));

    let store = SaveStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    let opened = GameSession::open("bad-deck".into(), "slot", config, RngBank::seeded(2), store);
    assert!(matches!(opened, Err(GameError::InvalidConfig { .. })));
}
