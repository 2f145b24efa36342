//! Cashflow: a single-player board game about escaping the rat race.
//!
//! The player circles a ring of payday, opportunity, doodad and market
//! spaces, buying assets until passive income exceeds expenses (the
//! "fast track"). `engine` holds the rules; `session` binds a game to a
//! save slot; everything else is content, plumbing or persistence.

pub mod board;
pub mod catalog;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod player;
pub mod rng;
pub mod session;
pub mod snapshot;
pub mod store;
pub mod types;
