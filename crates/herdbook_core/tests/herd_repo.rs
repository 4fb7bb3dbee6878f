use chrono::{TimeZone, Utc};
use herdbook_core::db::open_db_in_memory;
use herdbook_core::repo::slot_repo::SlotStore;
use herdbook_core::{
    demo_herd, load_or_seed, Cow, CowEvent, CowStatus, EventKind, HerdRepository, LoadSource,
    RepoError, Sex, SqliteHerdRepository, DEFAULT_SLOT_KEY,
};

fn sample_herd() -> Vec<Cow> {
    let created = Utc.with_ymd_and_hms(2026, 1, 10, 6, 30, 0).unwrap();
    let mut first = Cow::new("TAG-2001", Sex::Female, "North Paddock", created);
    first.status = CowStatus::InTreatment;
    first.weight = Some(455.5);
    first.daily_weight_gain = Some(0.65);
    first.events.push(CowEvent::with_id(
        "e1",
        EventKind::Treatment,
        "Hoof trim",
        Utc.with_ymd_and_hms(2026, 2, 1, 9, 0, 0).unwrap(),
    ));
    first.events.push(CowEvent::with_id(
        "e2",
        EventKind::WeightCheck,
        "Weigh-in",
        Utc.with_ymd_and_hms(2026, 1, 20, 9, 0, 0).unwrap(),
    ));

    let second = Cow::new("TAG-2002", Sex::Male, "Pen A", created);
    vec![first, second]
}

#[test]
fn save_then_load_roundtrips_every_field_and_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteHerdRepository::new(&conn);
    let herd = sample_herd();

    repo.save(&herd.iter().collect::<Vec<_>>()).unwrap();
    let loaded = repo.load().unwrap().unwrap();

    assert_eq!(loaded, herd);
    assert_eq!(loaded[0].events[0].id, "e1");
    assert_eq!(loaded[0].events[1].id, "e2");
}

#[test]
fn load_reports_absent_for_a_fresh_database() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteHerdRepository::new(&conn);
    assert!(repo.load().unwrap().is_none());
}

#[test]
fn load_reports_corrupt_payloads() {
    let conn = open_db_in_memory().unwrap();
    SlotStore::new(&conn)
        .write_slot(DEFAULT_SLOT_KEY, "not json at all")
        .unwrap();

    let repo = SqliteHerdRepository::new(&conn);
    assert!(matches!(repo.load(), Err(RepoError::CorruptData(_))));
}

#[test]
fn load_reports_non_utf8_slot_text_as_corrupt() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO kv_slots (key, value) VALUES (?1, CAST(X'FFFE5B5D' AS TEXT));",
        [DEFAULT_SLOT_KEY],
    )
    .unwrap();

    let repo = SqliteHerdRepository::new(&conn);
    assert!(matches!(repo.load(), Err(RepoError::CorruptData(_))));

    let (cows, source) = load_or_seed(&repo).unwrap();
    assert_eq!(source, LoadSource::SeededCorrupt);
    assert_eq!(cows.len(), 8);
    assert_eq!(repo.load().unwrap().unwrap().len(), 8);
}

#[test]
fn load_keeps_stored_cows_that_break_registration_rules() {
    let conn = open_db_in_memory().unwrap();
    let payload = r#"[{"earTag":"OLD-1","sex":"Male","pen":"Pen A","status":"Active","weight":0,
                       "createdAt":"2026-01-01T00:00:00Z","events":[]},
                      {"earTag":"OLD-2","sex":"Female","pen":" ","status":"Sold",
                       "createdAt":"2026-01-02T00:00:00Z","events":[]}]"#;
    SlotStore::new(&conn)
        .write_slot(DEFAULT_SLOT_KEY, payload)
        .unwrap();

    let repo = SqliteHerdRepository::new(&conn);
    let (cows, source) = load_or_seed(&repo).unwrap();
    assert_eq!(source, LoadSource::Stored);
    assert_eq!(cows.len(), 2);
    assert_eq!(cows[0].weight, Some(0.0));
    assert_eq!(cows[1].pen, " ");
}

#[test]
fn slots_are_isolated_by_key() {
    let conn = open_db_in_memory().unwrap();
    let main = SqliteHerdRepository::new(&conn);
    let scratch = SqliteHerdRepository::try_new(&conn, "scratch_herd").unwrap();

    let herd = sample_herd();
    scratch.save(&herd.iter().collect::<Vec<_>>()).unwrap();

    assert!(main.load().unwrap().is_none());
    assert_eq!(scratch.load().unwrap().unwrap().len(), 2);
    assert_eq!(scratch.slot_key(), "scratch_herd");
}

#[test]
fn blank_slot_key_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let err = SqliteHerdRepository::try_new(&conn, "   ").err().unwrap();
    assert!(matches!(err, RepoError::InvalidSlotKey(_)));
}

#[test]
fn load_or_seed_persists_the_seed_when_slot_is_absent() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteHerdRepository::new(&conn);

    let (herd, source) = load_or_seed(&repo).unwrap();
    assert_eq!(source, LoadSource::SeededAbsent);
    assert_eq!(herd.len(), 8);

    let stored = repo.load().unwrap().unwrap();
    assert_eq!(stored, herd);
}

#[test]
fn load_or_seed_replaces_corrupt_slot_with_seed() {
    let conn = open_db_in_memory().unwrap();
    SlotStore::new(&conn)
        .write_slot(DEFAULT_SLOT_KEY, "[{\"earTag\": 42}]")
        .unwrap();
    let repo = SqliteHerdRepository::new(&conn);

    let (herd, source) = load_or_seed(&repo).unwrap();
    assert_eq!(source, LoadSource::SeededCorrupt);
    assert_eq!(herd.len(), 8);
    assert!(repo.load().unwrap().is_some());
}

#[test]
fn load_or_seed_keeps_stored_herd() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteHerdRepository::new(&conn);
    repo.save(&sample_herd().iter().collect::<Vec<_>>()).unwrap();

    let (herd, source) = load_or_seed(&repo).unwrap();
    assert_eq!(source, LoadSource::Stored);
    assert_eq!(herd, sample_herd());
}

#[test]
fn custom_seed_replaces_demo_herd() {
    fn tiny_seed(now: chrono::DateTime<Utc>) -> Vec<Cow> {
        vec![Cow::new("SEED-1", Sex::Female, "Pen Z", now)]
    }

    let conn = open_db_in_memory().unwrap();
    let repo = SqliteHerdRepository::new(&conn).with_seed(tiny_seed);
    let (herd, _) = load_or_seed(&repo).unwrap();
    assert_eq!(herd.len(), 1);
    assert_eq!(herd[0].ear_tag, "SEED-1");
    assert_ne!(demo_herd(Utc::now()).len(), herd.len());
}
