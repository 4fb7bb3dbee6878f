//! Durable herd adapter: load, save and seed the canonical cow list.
//!
//! # Responsibility
//! - Serialize the full herd as one JSON array into a named slot.
//! - Decode stored herds on load.
//! - Provide the seed herd used for first start and corruption recovery.
//!
//! # Invariants
//! - `load` never returns a herd with repeated ear tags.
//! - `load` does not apply record rules: a decodable herd written by an
//!   older or laxer build is returned as stored, never reseeded.
//! - `save` always writes the complete sequence; there are no partial saves.

use super::seed::{demo_herd, DEFAULT_SLOT_KEY};
use super::slot_repo::{normalize_slot_key, SlotStore};
use super::{RepoError, RepoResult};
use crate::model::cow::Cow;
use chrono::{DateTime, Utc};
use log::{info, warn};
use rusqlite::Connection;
use std::collections::HashSet;

/// Builds a fallback herd for the given clock.
pub type SeedFn = fn(DateTime<Utc>) -> Vec<Cow>;

/// Durable storage boundary for the herd collection.
pub trait HerdRepository {
    /// Reads the stored herd.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet and
    /// `Err(RepoError::CorruptData)` when the stored payload cannot be
    /// decoded into a valid herd.
    fn load(&self) -> RepoResult<Option<Vec<Cow>>>;

    /// Overwrites the stored herd with `cows`, in order.
    fn save(&self, cows: &[&Cow]) -> RepoResult<()>;

    /// Returns the fixed fallback herd.
    fn seed(&self) -> Vec<Cow>;
}

/// Where the herd held by a freshly opened store came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Decoded from the durable slot.
    Stored,
    /// Slot was empty; the seed herd was written.
    SeededAbsent,
    /// Slot was unreadable; the seed herd replaced it.
    SeededCorrupt,
}

/// Loads the stored herd, falling back to the seed herd.
///
/// The seed is persisted immediately whenever it is used. Corruption is
/// logged and absorbed here; only transport-level failures are returned.
pub fn load_or_seed<R>(repo: &R) -> RepoResult<(Vec<Cow>, LoadSource)>
where
    R: HerdRepository + ?Sized,
{
    let source = match repo.load() {
        Ok(Some(cows)) => {
            info!(
                "event=herd_load module=repo status=ok source=stored count={}",
                cows.len()
            );
            return Ok((cows, LoadSource::Stored));
        }
        Ok(None) => {
            info!("event=herd_load module=repo status=absent");
            LoadSource::SeededAbsent
        }
        Err(RepoError::CorruptData(message)) => {
            warn!("event=herd_load module=repo status=corrupt action=reseed error={message}");
            LoadSource::SeededCorrupt
        }
        Err(err) => return Err(err),
    };

    let seed = repo.seed();
    repo.save(&seed.iter().collect::<Vec<_>>())?;
    info!(
        "event=herd_seed module=repo status=ok count={}",
        seed.len()
    );
    Ok((seed, source))
}

/// Herd adapter backed by one SQLite key-value slot.
pub struct SqliteHerdRepository<'conn> {
    slots: SlotStore<'conn>,
    slot_key: String,
    seed: SeedFn,
}

impl<'conn> SqliteHerdRepository<'conn> {
    /// Creates an adapter over the default slot with the demo seed herd.
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            slots: SlotStore::new(conn),
            slot_key: DEFAULT_SLOT_KEY.to_string(),
            seed: demo_herd,
        }
    }

    /// Creates an adapter over a caller-chosen slot.
    ///
    /// # Errors
    /// - `RepoError::InvalidSlotKey` when `slot_key` is blank.
    pub fn try_new(conn: &'conn Connection, slot_key: &str) -> RepoResult<Self> {
        let slot_key = normalize_slot_key(slot_key)?.to_string();
        Ok(Self {
            slot_key,
            ..Self::new(conn)
        })
    }

    /// Replaces the fallback herd builder.
    pub fn with_seed(mut self, seed: SeedFn) -> Self {
        self.seed = seed;
        self
    }

    pub fn slot_key(&self) -> &str {
        &self.slot_key
    }
}

impl HerdRepository for SqliteHerdRepository<'_> {
    fn load(&self) -> RepoResult<Option<Vec<Cow>>> {
        let Some(raw) = self.slots.read_slot(&self.slot_key)? else {
            return Ok(None);
        };
        decode_herd(&raw).map(Some)
    }

    fn save(&self, cows: &[&Cow]) -> RepoResult<()> {
        let payload = serde_json::to_string(cows).map_err(RepoError::Encode)?;
        self.slots.write_slot(&self.slot_key, &payload)
    }

    fn seed(&self) -> Vec<Cow> {
        (self.seed)(Utc::now())
    }
}

/// Decodes one stored herd document and checks ear tag uniqueness.
fn decode_herd(raw: &str) -> RepoResult<Vec<Cow>> {
    let cows: Vec<Cow> = serde_json::from_str(raw)
        .map_err(|err| RepoError::CorruptData(format!("undecodable herd payload: {err}")))?;

    let mut tags = HashSet::with_capacity(cows.len());
    for cow in &cows {
        if !tags.insert(cow.ear_tag.as_str()) {
            return Err(RepoError::CorruptData(format!(
                "ear tag `{}` is stored more than once",
                cow.ear_tag
            )));
        }
    }

    Ok(cows)
}
