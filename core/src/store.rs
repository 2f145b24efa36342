//! SQLite persistence layer.
//!
//! RULE: Only store.rs talks to the database.
//! The session calls store methods: it never executes SQL directly.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use crate::{
    error::GameResult,
    event::EventLogEntry,
    types::Turn,
};

pub struct SaveStore {
    conn: Connection,
}

impl SaveStore {
    /// Open (or create) the save database at `path`.
    pub fn open(path: &str) -> GameResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> GameResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order. Safe to call repeatedly.
    pub fn migrate(&self) -> GameResult<()> {
        self.conn.execute_batch(include_str!("../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    // ── Save slots ─────────────────────────────────────────────

    /// Write (or overwrite) the blob stored under `key`.
    pub fn save_blob(&self, key: &str, payload: &str) -> GameResult<()> {
        self.conn.execute(
            "INSERT INTO save_slot (slot_key, payload, saved_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(slot_key) DO UPDATE SET payload = excluded.payload,
                                                 saved_at = excluded.saved_at",
            params![key, payload, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn load_blob(&self, key: &str) -> GameResult<Option<String>> {
        let payload = self.conn.query_row(
            "SELECT payload FROM save_slot WHERE slot_key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        ).optional()?;
        Ok(payload)
    }

    /// When the slot was last written. None if the slot is empty or the
    /// timestamp does not parse.
    pub fn saved_at(&self, key: &str) -> GameResult<Option<DateTime<Utc>>> {
        let raw: Option<String> = self.conn.query_row(
            "SELECT saved_at FROM save_slot WHERE slot_key = ?1",
            params![key],
            |row| row.get(0),
        ).optional()?;
        Ok(raw
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|t| t.with_timezone(&Utc)))
    }

    pub fn delete_blob(&self, key: &str) -> GameResult<()> {
        self.conn.execute("DELETE FROM save_slot WHERE slot_key = ?1", params![key])?;
        Ok(())
    }

    // ── Event log ──────────────────────────────────────────────

    pub fn append_event(&self, entry: &EventLogEntry) -> GameResult<()> {
        self.conn.execute(
            "INSERT INTO event_log (game_id, turn, event_type, payload, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.game_id,
                entry.turn as i64,
                entry.event_type,
                entry.payload,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn events_for_game(&self, game_id: &str) -> GameResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, game_id, turn, event_type, payload
             FROM event_log WHERE game_id = ?1
             ORDER BY id ASC"
        )?;
        let entries = stmt.query_map(params![game_id], row_to_entry)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn events_for_turn(&self, game_id: &str, turn: Turn) -> GameResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, game_id, turn, event_type, payload
             FROM event_log WHERE game_id = ?1 AND turn = ?2
             ORDER BY id ASC"
        )?;
        let entries = stmt.query_map(params![game_id, turn as i64], row_to_entry)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn event_count(&self, game_id: &str) -> GameResult<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM event_log WHERE game_id = ?1",
            params![game_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<EventLogEntry> {
    Ok(EventLogEntry {
        id:         Some(row.get(0)?),
        game_id:    row.get(1)?,
        turn:       row.get::<_, i64>(2)? as Turn,
        event_type: row.get(3)?,
        payload:    row.get(4)?,
    })
}
