//! Reactive herd store.
//!
//! # Responsibility
//! - Hold the canonical herd as an observable sequence of shared cows.
//! - Validate and apply mutations, then persist the full herd.
//! - Expose the filter registers, the filtered view and query helpers.
//!
//! # Invariants
//! - No two cows share an ear tag at any observable instant.
//! - The herd only grows; the single in-place change is appending an event
//!   to one cow, which replaces that cow's handle and keeps all others.
//! - A failed save never rolls back the in-memory herd.
//! - Mutations check and apply within one call; there is no window between
//!   the duplicate check and the append.

use crate::model::cow::{Cow, CowEvent, CowStatus, CowValidationError, Sex};
use crate::reactive::observable::{Observable, Subscription};
use crate::repo::herd_repo::{load_or_seed, HerdRepository, LoadSource};
use crate::repo::RepoError;
use crate::service::filter::FilterCriteria;
use crate::service::filtered_view::{CowList, FilteredView};
use crate::service::queries;
use chrono::{DateTime, Utc};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

pub type HerdResult<T> = Result<T, HerdError>;

/// Failure of a herd store operation.
#[derive(Debug)]
pub enum HerdError {
    /// A cow with this ear tag already exists; the herd is unchanged.
    DuplicateKey(String),
    /// Record rules rejected the input; the herd is unchanged.
    Validation(CowValidationError),
    /// No cow carries this ear tag.
    CowNotFound(String),
    /// The target cow already has an event with this id.
    DuplicateEventId { ear_tag: String, event_id: String },
    /// The change is live in memory but the durable copy is stale.
    Persist(RepoError),
    /// The durable store could not be read at open time.
    Load(RepoError),
}

impl Display for HerdError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateKey(ear_tag) => write!(f, "ear tag already in use: `{ear_tag}`"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::CowNotFound(ear_tag) => write!(f, "cow not found: `{ear_tag}`"),
            Self::DuplicateEventId { ear_tag, event_id } => {
                write!(f, "cow `{ear_tag}` already has event `{event_id}`")
            }
            Self::Persist(err) => write!(f, "herd changed but was not saved: {err}"),
            Self::Load(err) => write!(f, "failed to load herd: {err}"),
        }
    }
}

impl Error for HerdError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Persist(err) | Self::Load(err) => Some(err),
            Self::DuplicateKey(_) | Self::CowNotFound(_) | Self::DuplicateEventId { .. } => None,
        }
    }
}

impl From<CowValidationError> for HerdError {
    fn from(value: CowValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Registration input for a new cow.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCow {
    pub ear_tag: String,
    pub sex: Sex,
    pub pen: String,
    /// Defaults to `CowStatus::Active`.
    pub status: CowStatus,
    pub weight: Option<f64>,
}

impl NewCow {
    pub fn new(ear_tag: impl Into<String>, sex: Sex, pen: impl Into<String>) -> Self {
        Self {
            ear_tag: ear_tag.into(),
            sex,
            pen: pen.into(),
            status: CowStatus::default(),
            weight: None,
        }
    }
}

/// Canonical in-memory herd kept in sync with a durable repository.
pub struct HerdStore<R: HerdRepository> {
    repo: R,
    cows: Observable<CowList>,
    criteria: FilterCriteria,
    view: FilteredView,
    load_source: LoadSource,
}

impl<R: HerdRepository> HerdStore<R> {
    /// Loads the herd (or seeds it) and wires the filtered view.
    ///
    /// # Errors
    /// - `HerdError::Load` when the repository cannot be read or the seed
    ///   herd cannot be written. Corrupt stored data is not an error; it is
    ///   replaced by the seed herd.
    pub fn open(repo: R) -> HerdResult<Self> {
        let (cows, load_source) = load_or_seed(&repo).map_err(|err| {
            error!("event=herd_open module=service status=error error={err}");
            HerdError::Load(err)
        })?;

        let cows = Observable::new(cows.into_iter().map(Rc::new).collect::<CowList>());
        let criteria = FilterCriteria::new();
        let view = FilteredView::new(&cows, &criteria);

        Ok(Self {
            repo,
            cows,
            criteria,
            view,
            load_source,
        })
    }

    /// Returns the current herd in insertion order.
    pub fn current(&self) -> Rc<CowList> {
        self.cows.current()
    }

    /// Observes the full herd: once immediately, then after every change.
    pub fn subscribe(&self, observer: impl Fn(&Rc<CowList>) + 'static) -> Subscription {
        self.cows.subscribe(observer)
    }

    /// Appends one cow to the end of the herd and persists the result.
    ///
    /// # Errors
    /// - `DuplicateKey` / `Validation`: nothing changed, nothing notified.
    /// - `Persist`: the cow is in the herd and observers were notified, but
    ///   the durable copy does not contain it yet.
    pub fn append(&self, cow: Cow) -> HerdResult<Rc<Cow>> {
        if let Err(err) = cow.validate() {
            warn!("event=cow_append module=service status=invalid error={err}");
            return Err(err.into());
        }

        let current = self.cows.current();
        if !queries::is_tag_unique(&current, &cow.ear_tag) {
            warn!(
                "event=cow_append module=service status=duplicate ear_tag={}",
                cow.ear_tag
            );
            return Err(HerdError::DuplicateKey(cow.ear_tag));
        }

        let cow = Rc::new(cow);
        let mut next = Vec::with_capacity(current.len() + 1);
        next.extend(current.iter().cloned());
        next.push(Rc::clone(&cow));
        drop(current);

        self.cows.set(next);
        info!(
            "event=cow_append module=service status=ok ear_tag={} count={}",
            cow.ear_tag,
            self.cows.current().len()
        );
        self.persist()?;
        Ok(cow)
    }

    /// Builds a cow from registration input and appends it.
    ///
    /// Ear tag and pen are trimmed; the cow starts without history and is
    /// stamped with the current time.
    pub fn register(&self, request: NewCow) -> HerdResult<Rc<Cow>> {
        let mut cow = Cow::new(
            request.ear_tag.trim(),
            request.sex,
            request.pen.trim(),
            Utc::now(),
        );
        cow.status = request.status;
        cow.weight = request.weight;
        self.append(cow)
    }

    /// Appends one event to the history of the cow with `ear_tag`.
    ///
    /// Returns the replacement handle for that cow.
    pub fn record_event(&self, ear_tag: &str, event: CowEvent) -> HerdResult<Rc<Cow>> {
        let current = self.cows.current();
        let Some(index) = current.iter().position(|cow| cow.ear_tag == ear_tag) else {
            return Err(HerdError::CowNotFound(ear_tag.to_string()));
        };

        let target = &current[index];
        // Only the new event is checked; a stored cow that predates the
        // record rules still accepts history.
        if event.id.trim().is_empty() {
            return Err(CowValidationError::BlankEventId {
                ear_tag: ear_tag.to_string(),
            }
            .into());
        }
        if target.has_event(&event.id) {
            return Err(HerdError::DuplicateEventId {
                ear_tag: ear_tag.to_string(),
                event_id: event.id,
            });
        }

        let mut updated = Cow::clone(target);
        updated.events.push(event);

        let updated = Rc::new(updated);
        let mut next: CowList = current.iter().cloned().collect();
        next[index] = Rc::clone(&updated);
        drop(current);

        self.cows.set(next);
        info!(
            "event=event_append module=service status=ok ear_tag={} events={}",
            updated.ear_tag,
            updated.events.len()
        );
        self.persist()?;
        Ok(updated)
    }

    /// Saves the current herd.
    ///
    /// Called after every mutation; callers may invoke it again to retry
    /// after a `Persist` failure.
    pub fn persist(&self) -> HerdResult<()> {
        // Saves whatever is current, so a nested mutation made by an observer
        // is never overwritten by an older snapshot.
        let cows = self.cows.current();
        let refs: Vec<&Cow> = cows.iter().map(Rc::as_ref).collect();
        match self.repo.save(&refs) {
            Ok(()) => {
                info!(
                    "event=herd_save module=service status=ok count={}",
                    refs.len()
                );
                Ok(())
            }
            Err(err) => {
                error!("event=herd_save module=service status=error error={err}");
                Err(HerdError::Persist(err))
            }
        }
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Filtered view driven by [`Self::criteria`].
    pub fn filtered(&self) -> &FilteredView {
        &self.view
    }

    /// Builds an additional view over this herd with its own registers.
    pub fn view_with(&self, criteria: &FilterCriteria) -> FilteredView {
        FilteredView::new(&self.cows, criteria)
    }

    pub fn is_tag_unique(&self, ear_tag: &str) -> bool {
        queries::is_tag_unique(&self.cows.current(), ear_tag)
    }

    pub fn find_by_tag(&self, ear_tag: &str) -> Option<Rc<Cow>> {
        queries::find_by_tag(&self.cows.current(), ear_tag)
    }

    /// Distinct pens, sorted ascending.
    pub fn pens(&self) -> Vec<String> {
        queries::distinct_pens(&self.cows.current())
    }

    /// Most recent event date of `cow`; see [`Cow::latest_event_date`].
    pub fn latest_event_date(&self, cow: &Cow) -> Option<DateTime<Utc>> {
        cow.latest_event_date()
    }

    pub fn load_source(&self) -> LoadSource {
        self.load_source
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }
}
