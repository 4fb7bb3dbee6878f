//! Cow and cow-event domain records.
//!
//! # Responsibility
//! - Define the canonical record shape persisted in the herd slot.
//! - Provide validation and history helpers used by the store.
//!
//! # Invariants
//! - `ear_tag` is the natural key and never changes after creation.
//! - Event ids are unique within one cow only.
//! - Serialized field and enum names match the stored JSON schema
//!   (`earTag`, `"In Treatment"`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Smallest weight accepted for a recorded animal, in kilograms.
pub const MIN_WEIGHT_KG: f64 = 0.1;

/// Biological sex of a cow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

/// Lifecycle status of a cow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CowStatus {
    #[default]
    Active,
    #[serde(rename = "In Treatment")]
    InTreatment,
    Deceased,
}

impl CowStatus {
    /// Selectable statuses, in display order.
    pub const ALL: [CowStatus; 3] = [Self::Active, Self::InTreatment, Self::Deceased];

    /// Human label, identical to the serialized form.
    ///
    /// The status filter register compares against this value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::InTreatment => "In Treatment",
            Self::Deceased => "Deceased",
        }
    }
}

impl Display for CowStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of a cow history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    #[serde(rename = "Weight Check")]
    WeightCheck,
    Treatment,
    #[serde(rename = "Pen Move")]
    PenMove,
    Death,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WeightCheck => "Weight Check",
            Self::Treatment => "Treatment",
            Self::PenMove => "Pen Move",
            Self::Death => "Death",
        }
    }
}

/// One timestamped history entry owned by a single cow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CowEvent {
    /// Unique within the owning cow; may repeat across cows.
    pub id: String,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub description: String,
}

impl CowEvent {
    /// Creates an event with a freshly generated id.
    pub fn new(kind: EventKind, description: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), kind, description, date)
    }

    /// Creates an event with a caller-provided id.
    ///
    /// Used by fixtures and imports where ids already exist.
    pub fn with_id(
        id: impl Into<String>,
        kind: EventKind,
        description: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            kind,
            description: description.into(),
        }
    }
}

/// Canonical herd record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cow {
    /// Natural key. Immutable once the cow is stored.
    pub ear_tag: String,
    pub sex: Sex,
    /// Current location group.
    pub pen: String,
    pub status: CowStatus,
    /// Kilograms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Kilograms per day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_weight_gain: Option<f64>,
    pub created_at: DateTime<Utc>,
    /// Insertion-ordered history.
    #[serde(default)]
    pub events: Vec<CowEvent>,
}

impl Cow {
    /// Creates an active cow with no weight data and an empty history.
    pub fn new(
        ear_tag: impl Into<String>,
        sex: Sex,
        pen: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            ear_tag: ear_tag.into(),
            sex,
            pen: pen.into(),
            status: CowStatus::Active,
            weight: None,
            daily_weight_gain: None,
            created_at,
            events: Vec::new(),
        }
    }

    /// Checks the record-level rules enforced before a cow enters the herd.
    ///
    /// # Errors
    /// - Blank ear tag or pen.
    /// - Weight below [`MIN_WEIGHT_KG`] or non-finite numeric fields.
    /// - Blank or repeated event ids.
    pub fn validate(&self) -> Result<(), CowValidationError> {
        if self.ear_tag.trim().is_empty() {
            return Err(CowValidationError::BlankEarTag);
        }
        if self.pen.trim().is_empty() {
            return Err(CowValidationError::BlankPen {
                ear_tag: self.ear_tag.clone(),
            });
        }
        if let Some(weight) = self.weight {
            if !weight.is_finite() || weight < MIN_WEIGHT_KG {
                return Err(CowValidationError::InvalidWeight(weight));
            }
        }
        if let Some(gain) = self.daily_weight_gain {
            if !gain.is_finite() {
                return Err(CowValidationError::InvalidDailyWeightGain(gain));
            }
        }

        let mut seen = HashSet::with_capacity(self.events.len());
        for event in &self.events {
            if event.id.trim().is_empty() {
                return Err(CowValidationError::BlankEventId {
                    ear_tag: self.ear_tag.clone(),
                });
            }
            if !seen.insert(event.id.as_str()) {
                return Err(CowValidationError::DuplicateEventId {
                    ear_tag: self.ear_tag.clone(),
                    event_id: event.id.clone(),
                });
            }
        }

        Ok(())
    }

    /// Returns whether `id` is already used by one of this cow's events.
    pub fn has_event(&self, id: &str) -> bool {
        self.events.iter().any(|event| event.id == id)
    }

    /// Returns the most recent event date, or `None` without history.
    ///
    /// When several events share the maximum date, the one inserted last
    /// is reported.
    pub fn latest_event_date(&self) -> Option<DateTime<Utc>> {
        self.events
            .iter()
            .fold(None::<&CowEvent>, |latest, event| match latest {
                Some(current) if current.date > event.date => Some(current),
                _ => Some(event),
            })
            .map(|event| event.date)
    }

    /// Returns history sorted by date, newest first.
    ///
    /// Sorting is stable: events sharing a date keep insertion order.
    pub fn events_newest_first(&self) -> Vec<&CowEvent> {
        let mut events: Vec<&CowEvent> = self.events.iter().collect();
        events.sort_by(|left, right| right.date.cmp(&left.date));
        events
    }
}

/// Record-level validation failure.
#[derive(Debug, Clone, PartialEq)]
pub enum CowValidationError {
    BlankEarTag,
    BlankPen { ear_tag: String },
    InvalidWeight(f64),
    InvalidDailyWeightGain(f64),
    BlankEventId { ear_tag: String },
    DuplicateEventId { ear_tag: String, event_id: String },
}

impl Display for CowValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankEarTag => write!(f, "ear tag cannot be blank"),
            Self::BlankPen { ear_tag } => write!(f, "pen cannot be blank for cow `{ear_tag}`"),
            Self::InvalidWeight(value) => {
                write!(f, "weight must be at least {MIN_WEIGHT_KG} kg, got {value}")
            }
            Self::InvalidDailyWeightGain(value) => {
                write!(f, "daily weight gain must be a finite number, got {value}")
            }
            Self::BlankEventId { ear_tag } => {
                write!(f, "event id cannot be blank for cow `{ear_tag}`")
            }
            Self::DuplicateEventId { ear_tag, event_id } => {
                write!(f, "event id `{event_id}` is repeated on cow `{ear_tag}`")
            }
        }
    }
}

impl Error for CowValidationError {}
