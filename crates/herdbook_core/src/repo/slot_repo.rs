//! Named key-value slots stored in SQLite.
//!
//! # Invariants
//! - Keys are trimmed and must be non-empty.
//! - `write_slot` replaces the previous value atomically.
//! - A stored value that is not UTF-8 text reads as `CorruptData`, never as
//!   a transport error.

use super::{RepoError, RepoResult};
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OptionalExtension};

/// Key-value slot access over the `kv_slots` table.
pub struct SlotStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SlotStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Returns the raw slot value, or `None` when the slot was never written.
    pub fn read_slot(&self, key: &str) -> RepoResult<Option<String>> {
        let key = normalize_slot_key(key)?;
        let raw = self
            .conn
            .query_row(
                "SELECT value FROM kv_slots WHERE key = ?1;",
                [key],
                |row| {
                    Ok(match row.get_ref(0)? {
                        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => Ok(bytes.to_vec()),
                        other => Err(other.data_type()),
                    })
                },
            )
            .optional()?;

        match raw {
            None => Ok(None),
            Some(Ok(bytes)) => String::from_utf8(bytes).map(Some).map_err(|err| {
                RepoError::CorruptData(format!("slot `{key}` is not valid UTF-8: {err}"))
            }),
            Some(Err(data_type)) => Err(RepoError::CorruptData(format!(
                "slot `{key}` holds {data_type} instead of text"
            ))),
        }
    }

    /// Overwrites (or creates) one slot.
    pub fn write_slot(&self, key: &str, value: &str) -> RepoResult<()> {
        let key = normalize_slot_key(key)?;
        self.conn.execute(
            "INSERT INTO kv_slots (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }
}

pub(crate) fn normalize_slot_key(key: &str) -> RepoResult<&str> {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return Err(RepoError::InvalidSlotKey(key.to_string()));
    }
    Ok(trimmed)
}
