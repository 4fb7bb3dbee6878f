//! Runtime configuration for embedding the herd store.
//!
//! Defaults can be overridden through `HERDBOOK_*` environment variables.

use crate::db::{open_db, DbResult};
use crate::logging::{default_log_level, init_logging, LogLevel, LoggingError};
use crate::repo::herd_repo::SqliteHerdRepository;
use crate::repo::seed::DEFAULT_SLOT_KEY;
use crate::repo::RepoResult;
use rusqlite::Connection;
use std::path::PathBuf;

pub const DEFAULT_DB_FILE_NAME: &str = "herdbook.sqlite3";

const ENV_DB_PATH: &str = "HERDBOOK_DB_PATH";
const ENV_SLOT_KEY: &str = "HERDBOOK_SLOT_KEY";
const ENV_LOG_LEVEL: &str = "HERDBOOK_LOG_LEVEL";
const ENV_LOG_DIR: &str = "HERDBOOK_LOG_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HerdConfig {
    pub db_path: PathBuf,
    pub slot_key: String,
    pub log_level: LogLevel,
    /// File logging stays off while this is `None`.
    pub log_dir: Option<PathBuf>,
}

impl Default for HerdConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            slot_key: DEFAULT_SLOT_KEY.to_string(),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl HerdConfig {
    /// Defaults overridden by `HERDBOOK_*` process environment variables.
    ///
    /// # Errors
    /// - `LoggingError::UnsupportedLevel` for an unknown `HERDBOOK_LOG_LEVEL`.
    pub fn from_env() -> Result<Self, LoggingError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with an injectable variable source.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LoggingError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(key) = read(ENV_SLOT_KEY) {
            config.slot_key = key;
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = level.parse()?;
        }
        config.log_dir = read(ENV_LOG_DIR).map(PathBuf::from);
        Ok(config)
    }

    /// Opens the configured database file, creating the slot table if needed.
    pub fn open_connection(&self) -> DbResult<Connection> {
        open_db(&self.db_path)
    }

    /// Binds a herd repository on `conn` to the configured slot.
    ///
    /// # Errors
    /// - `RepoError::InvalidSlotKey` when `slot_key` is blank.
    pub fn open_repository<'conn>(
        &self,
        conn: &'conn Connection,
    ) -> RepoResult<SqliteHerdRepository<'conn>> {
        SqliteHerdRepository::try_new(conn, &self.slot_key)
    }

    /// Starts file logging when a log directory is configured.
    pub fn init_logging(&self) -> Result<(), LoggingError> {
        match &self.log_dir {
            Some(dir) => init_logging(self.log_level, dir),
            None => Ok(()),
        }
    }
}
