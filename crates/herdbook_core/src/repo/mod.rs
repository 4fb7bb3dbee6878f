//! Durable storage adapters for the herd collection.
//!
//! # Responsibility
//! - Map the canonical cow list onto one named key-value slot.
//! - Supply the demo herd when the slot is missing or unreadable.
//!
//! # Invariants
//! - A slot is always overwritten as a whole; partial writes never happen.
//! - Read paths report undecodable payloads and repeated ear tags as
//!   `CorruptData` instead of masking them.

pub mod herd_repo;
pub mod seed;
pub mod slot_repo;

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for slot access and herd payload encoding.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Slot exists but does not hold a valid herd document.
    CorruptData(String),
    Encode(serde_json::Error),
    InvalidSlotKey(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::CorruptData(message) => write!(f, "corrupt herd data: {message}"),
            Self::Encode(err) => write!(f, "failed to encode herd data: {err}"),
            Self::InvalidSlotKey(key) => write!(f, "invalid slot key: `{key}`"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::CorruptData(_) | Self::InvalidSlotKey(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Query(value))
    }
}
