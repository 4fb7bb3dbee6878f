//! Opening herd databases.
//!
//! # Invariants
//! - Returned connections carry the current slot layout.
//! - Every open attempt emits one `db_open` start event and one terminal
//!   ok/error event carrying `duration_ms`.

use super::schema::ensure_schema;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Opens (creating if missing) the herd database at `path`.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    open_with("file", || Connection::open(path))
}

/// Opens a private in-memory herd database.
///
/// Each call yields an independent, empty herd store.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with("memory", Connection::open_in_memory)
}

fn open_with(
    mode: &'static str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let result = connect().map_err(DbError::Unavailable).and_then(|mut conn| {
        conn.busy_timeout(Duration::from_secs(5))?;
        ensure_schema(&mut conn)?;
        Ok(conn)
    });

    let duration_ms = started_at.elapsed().as_millis();
    match &result {
        Ok(_) => info!("event=db_open module=db status=ok mode={mode} duration_ms={duration_ms}"),
        Err(err) => {
            let code = match err {
                DbError::Unavailable(_) => "db_unavailable",
                DbError::SchemaTooNew { .. } => "db_schema_too_new",
                DbError::Query(_) => "db_setup_failed",
            };
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={duration_ms} error_code={code} error={err}"
            );
        }
    }
    result
}
