use boolchart_core::{
    days_in_month, entry_index, is_archived, remove_card, Card, CardError, CardId, EntryState,
};
use chrono::{DateTime, Datelike, Local, TimeZone};

fn at(year: i32, month: u32, day: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

#[test]
fn create_sizes_entries_to_current_month() {
    let now = Local::now();
    let card = Card::create("X", now).unwrap();

    assert_eq!(
        card.entries.len(),
        days_in_month(now.month0(), now.year()) as usize
    );
    assert!(card.entries.iter().all(|done| !done));
    assert_eq!(card.name, "X");
}

#[test]
fn create_uses_given_moment() {
    let now = at(2024, 2, 10);
    let card = Card::create("Stretch", now).unwrap();

    assert_eq!(card.created_at, now);
    assert_eq!(card.entries.len(), 29);
    assert_eq!(card.start_day(), 10);
    assert_eq!(card.tracked_month(), (2024, 1));
}

#[test]
fn create_and_rename_reject_blank_names() {
    assert_eq!(Card::new("").unwrap_err(), CardError::EmptyName);
    assert_eq!(Card::new("   ").unwrap_err(), CardError::EmptyName);

    let card = Card::create("Read", at(2024, 9, 1)).unwrap();
    assert_eq!(card.renamed("\t").unwrap_err(), CardError::EmptyName);

    let renamed = card.renamed("  Read 20 Pages ").unwrap();
    assert_eq!(renamed.name, "Read 20 Pages");
    assert_eq!(renamed.id, card.id);
    assert_eq!(renamed.entries, card.entries);
    assert_eq!(card.name, "Read");
}

#[test]
fn toggle_twice_restores_original() {
    let card = Card::create("Meditate", at(2024, 9, 1)).unwrap();

    let once = card.toggled(4).unwrap();
    assert!(once.entries[4]);
    assert!(!card.entries[4]);
    assert_eq!(once.toggled(4).unwrap(), card);
}

#[test]
fn toggle_rejects_out_of_range_index() {
    let card = Card::create("Meditate", at(2024, 9, 1)).unwrap();

    let err = card.toggled(30).unwrap_err();
    assert_eq!(err, CardError::IndexOutOfRange { index: 30, len: 30 });
    assert!(card.toggled(entry_index(4, 1)).is_ok());
}

#[test]
fn archived_when_viewed_in_another_month() {
    let card = Card::create("Diet", at(2024, 8, 15)).unwrap();

    assert!(is_archived(&card, &at(2024, 9, 1)));
    assert!(card.is_archived(&at(2025, 8, 15)));
    assert!(!card.is_archived(&at(2024, 8, 31)));
}

#[test]
fn entry_state_marks_days_before_start() {
    let card = Card::create("Leetcode", at(2024, 9, 3))
        .unwrap()
        .toggled(2)
        .unwrap();

    assert_eq!(card.entry_state(0), Some(EntryState::PreTracking));
    assert_eq!(card.entry_state(1), Some(EntryState::PreTracking));
    assert_eq!(card.entry_state(2), Some(EntryState::Complete));
    assert_eq!(card.entry_state(3), Some(EntryState::Incomplete));
    assert_eq!(card.entry_state(30), None);
    assert_eq!(card.completed_count(), 1);
}

#[test]
fn remove_missing_id_keeps_collection() {
    let first = Card::create("A", at(2024, 9, 1)).unwrap();
    let second = Card::create("B", at(2024, 9, 1)).unwrap();
    let cards = vec![first.clone(), second.clone()];

    assert_eq!(remove_card(&cards, &CardId::from("missing")), cards);

    let remaining = remove_card(&cards, &first.id);
    assert_eq!(remaining, vec![second]);
    assert_eq!(cards.len(), 2);
}
