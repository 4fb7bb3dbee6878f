//! Demo herd used when no stored herd is available.
//!
//! Dates are relative to the supplied clock so the fixture always looks
//! recent: every date is `now - N days`.

use crate::model::cow::{Cow, CowEvent, CowStatus, EventKind, Sex};
use chrono::{DateTime, Duration, Utc};

/// Slot key the herd document is stored under unless configured otherwise.
pub const DEFAULT_SLOT_KEY: &str = "cow_catalog_data";

/// Builds the fixed eight-cow demo herd spread across three pens.
pub fn demo_herd(now: DateTime<Utc>) -> Vec<Cow> {
    let days_ago = |days: i64| now - Duration::days(days);
    let event = |id: &str, days: i64, kind: EventKind, description: &str| {
        CowEvent::with_id(id, kind, description, days_ago(days))
    };
    let cow = |ear_tag: &str,
               sex: Sex,
               pen: &str,
               status: CowStatus,
               weight: f64,
               gain: Option<f64>,
               created_days_ago: i64,
               events: Vec<CowEvent>| Cow {
        ear_tag: ear_tag.to_string(),
        sex,
        pen: pen.to_string(),
        status,
        weight: Some(weight),
        daily_weight_gain: gain,
        created_at: days_ago(created_days_ago),
        events,
    };

    vec![
        cow(
            "TAG-1001",
            Sex::Female,
            "Pen A",
            CowStatus::Active,
            520.0,
            Some(0.8),
            120,
            vec![
                event("e1", 2, EventKind::WeightCheck, "Routine weigh-in - 520 kg"),
                event("e2", 30, EventKind::PenMove, "Moved from Pen C to Pen A"),
                event("e3", 60, EventKind::Treatment, "Administered vaccine booster"),
            ],
        ),
        cow(
            "TAG-1002",
            Sex::Male,
            "Pen B",
            CowStatus::Active,
            610.0,
            Some(1.1),
            200,
            vec![event("e4", 5, EventKind::WeightCheck, "Routine weigh-in - 610 kg")],
        ),
        cow(
            "TAG-1003",
            Sex::Female,
            "Pen A",
            CowStatus::InTreatment,
            480.0,
            Some(0.4),
            90,
            vec![
                event(
                    "e5",
                    1,
                    EventKind::Treatment,
                    "Antibiotic course started for hoof infection",
                ),
                event("e6", 10, EventKind::WeightCheck, "Routine weigh-in - 480 kg"),
            ],
        ),
        cow(
            "TAG-1004",
            Sex::Male,
            "Pen C",
            CowStatus::Active,
            540.0,
            Some(0.9),
            150,
            vec![
                event("e7", 7, EventKind::WeightCheck, "Routine weigh-in - 540 kg"),
                event("e8", 45, EventKind::PenMove, "Moved from Pen B to Pen C"),
            ],
        ),
        cow(
            "TAG-1005",
            Sex::Female,
            "Pen B",
            CowStatus::Deceased,
            390.0,
            None,
            300,
            vec![
                event(
                    "e9",
                    3,
                    EventKind::Death,
                    "Found deceased - natural causes suspected",
                ),
                event("e10", 20, EventKind::Treatment, "Treated for respiratory illness"),
                event("e11", 40, EventKind::WeightCheck, "Routine weigh-in - 390 kg"),
            ],
        ),
        cow(
            "TAG-1006",
            Sex::Male,
            "Pen A",
            CowStatus::Active,
            700.0,
            Some(1.3),
            250,
            vec![event("e12", 4, EventKind::WeightCheck, "Routine weigh-in - 700 kg")],
        ),
        cow(
            "TAG-1007",
            Sex::Female,
            "Pen C",
            CowStatus::InTreatment,
            460.0,
            Some(0.3),
            80,
            vec![
                event(
                    "e13",
                    0,
                    EventKind::Treatment,
                    "Eye infection - topical ointment applied",
                ),
                event(
                    "e14",
                    15,
                    EventKind::PenMove,
                    "Moved from Pen A to Pen C for isolation",
                ),
            ],
        ),
        cow(
            "TAG-1008",
            Sex::Male,
            "Pen B",
            CowStatus::Active,
            580.0,
            Some(1.0),
            100,
            vec![event("e15", 6, EventKind::WeightCheck, "Routine weigh-in - 580 kg")],
        ),
    ]
}
