//! Core herd logic for herdbook.
//!
//! This crate owns the canonical cow collection, its durable copy and the
//! live filtered view derived from it.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod reactive;
pub mod repo;
pub mod service;

pub use config::HerdConfig;
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::cow::{Cow, CowEvent, CowStatus, CowValidationError, EventKind, Sex};
pub use reactive::observable::{Observable, Subscription};
pub use repo::herd_repo::{load_or_seed, HerdRepository, LoadSource, SqliteHerdRepository};
pub use repo::seed::{demo_herd, DEFAULT_SLOT_KEY};
pub use repo::{RepoError, RepoResult};
pub use service::filter::{CowFilter, FilterCriteria};
pub use service::filtered_view::{CowList, FilteredView};
pub use service::herd_store::{HerdError, HerdResult, HerdStore, NewCow};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
