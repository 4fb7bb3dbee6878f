//! Slot table layout and its version gate.

use super::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// Layout revision written to `PRAGMA user_version`.
pub const SCHEMA_VERSION: u32 = 1;

const KV_SLOTS_SQL: &str = include_str!("kv_slots.sql");

/// Reads the layout revision stamped on `conn`.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?)
}

/// Creates the slot table on a fresh file and refuses files from newer builds.
///
/// Creating and stamping happen in one transaction, so a crash never leaves
/// a table without its version.
pub(crate) fn ensure_schema(conn: &mut Connection) -> DbResult<()> {
    let found = schema_version(conn)?;
    if found > SCHEMA_VERSION {
        return Err(DbError::SchemaTooNew {
            found,
            supported: SCHEMA_VERSION,
        });
    }
    if found == SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    tx.execute_batch(KV_SLOTS_SQL)?;
    tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    tx.commit()?;
    info!("event=db_schema module=db status=created version={SCHEMA_VERSION} from={found}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_connection_is_stamped_once() {
        let mut conn = Connection::open_in_memory().unwrap();
        assert_eq!(schema_version(&conn).unwrap(), 0);

        ensure_schema(&mut conn).unwrap();
        conn.execute("INSERT INTO kv_slots (key, value) VALUES ('a', '[]');", [])
            .unwrap();
        ensure_schema(&mut conn).unwrap();

        assert_eq!(schema_version(&conn).unwrap(), SCHEMA_VERSION);
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM kv_slots;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn blank_slot_key_violates_table_check() {
        let mut conn = Connection::open_in_memory().unwrap();
        ensure_schema(&mut conn).unwrap();
        let result = conn.execute("INSERT INTO kv_slots (key, value) VALUES ('  ', '[]');", []);
        assert!(result.is_err());
    }
}
