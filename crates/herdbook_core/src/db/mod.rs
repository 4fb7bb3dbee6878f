//! SQLite file backing the herd slot store.
//!
//! One table, `kv_slots`, holds whole JSON documents keyed by slot name.
//! Its layout revision lives in `PRAGMA user_version`.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    /// The database file could not be opened or created.
    Unavailable(rusqlite::Error),
    /// A statement against an open herd database failed.
    Query(rusqlite::Error),
    /// The file was laid out by a newer herdbook build.
    SchemaTooNew { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(err) => write!(f, "herd database unavailable: {err}"),
            Self::Query(err) => write!(f, "herd database query failed: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "herd database uses slot layout {found}; this build reads up to {supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Unavailable(err) | Self::Query(err) => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Query(value)
    }
}
