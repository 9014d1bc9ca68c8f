use boolchart_core::db::{open_db, open_db_in_memory};
use boolchart_core::{
    decode, CardError, CardId, CardService, KeyValueRepository, ServiceError,
    SqliteKeyValueRepository, StoreError, CARDS_KEY,
};
use chrono::{DateTime, Local, TimeZone};
use rusqlite::Connection;

fn october() -> DateTime<Local> {
    Local.with_ymd_and_hms(2026, 10, 19, 9, 30, 0).unwrap()
}

fn open_service(conn: &Connection) -> CardService<SqliteKeyValueRepository<'_>> {
    CardService::with_clock(SqliteKeyValueRepository::new(conn), october)
}

fn card_names(cards: &[boolchart_core::Card]) -> Vec<&str> {
    cards.iter().map(|card| card.name.as_str()).collect()
}

#[test]
fn open_loads_default_cards() {
    let conn = open_db_in_memory().unwrap();
    let service = open_service(&conn);

    assert_eq!(
        card_names(service.cards()),
        vec![
            "Apply for a job",
            "5 Leetcode Problems",
            "Read 15 Pages",
            "Follow Diet",
            "Meditate"
        ]
    );
    let archived: Vec<bool> = service
        .cards()
        .iter()
        .map(|card| card.is_archived(&october()))
        .collect();
    assert_eq!(archived, vec![false, false, true, false, false]);
}

#[test]
fn mutations_persist_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("boolchart.sqlite3");

    let (added_id, toggled_id) = {
        let conn = open_db(&path).unwrap();
        let mut service = open_service(&conn);
        let toggled_id = service.cards()[0].id.clone();
        let leetcode_id = service.cards()[1].id.clone();

        service.toggle_entry(&toggled_id, 18).unwrap();
        service.rename_card(&leetcode_id, "7 Leetcode Problems").unwrap();
        let cards = service.add_card("Journal").unwrap();
        let added_id = cards.last().unwrap().id.clone();
        assert_eq!(cards.len(), 6);
        assert!(service.last_save_error().is_none());
        (added_id, toggled_id)
    };

    let conn = open_db(&path).unwrap();
    let mut service = open_service(&conn);
    let cards = service.cards();
    assert_eq!(cards.len(), 6);
    assert!(cards[0].entries[18]);
    assert_eq!(cards[0].id, toggled_id);
    assert_eq!(cards[1].name, "7 Leetcode Problems");
    assert_eq!(cards[5].id, added_id);
    assert_eq!(cards[5].entries.len(), 31);

    let remaining = service.remove_card(&added_id);
    assert_eq!(remaining.len(), 5);
    assert!(remaining.iter().all(|card| card.id != added_id));
}

#[test]
fn blank_names_are_rejected_without_changes() {
    let conn = open_db_in_memory().unwrap();
    let mut service = open_service(&conn);
    let before = service.cards().to_vec();
    let id = before[0].id.clone();

    assert_eq!(
        service.add_card("  ").unwrap_err(),
        ServiceError::Card(CardError::EmptyName)
    );
    assert_eq!(
        service.rename_card(&id, "").unwrap_err(),
        ServiceError::Card(CardError::EmptyName)
    );
    assert_eq!(service.cards(), before.as_slice());
}

#[test]
fn toggle_rejects_bad_targets() {
    let conn = open_db_in_memory().unwrap();
    let mut service = open_service(&conn);
    let before = service.cards().to_vec();
    let current = before[0].id.clone();
    let archived = before[2].id.clone();
    let missing = CardId::from("missing");

    assert_eq!(
        service.toggle_entry(&current, 31).unwrap_err(),
        ServiceError::Card(CardError::IndexOutOfRange { index: 31, len: 31 })
    );
    assert_eq!(
        service.toggle_entry(&archived, 0).unwrap_err(),
        ServiceError::ArchivedCard(archived.clone())
    );
    assert_eq!(
        service.toggle_entry(&missing, 0).unwrap_err(),
        ServiceError::CardNotFound(missing.clone())
    );
    assert_eq!(service.cards(), before.as_slice());
}

#[test]
fn archived_cards_can_still_be_renamed_and_removed() {
    let conn = open_db_in_memory().unwrap();
    let mut service = open_service(&conn);
    let archived = service.cards()[2].id.clone();

    let cards = service.rename_card(&archived, "Read 20 Pages").unwrap();
    assert_eq!(cards[2].name, "Read 20 Pages");

    let cards = service.remove_card(&archived);
    assert_eq!(cards.len(), 4);
}

#[test]
fn remove_unknown_id_is_noop() {
    let conn = open_db_in_memory().unwrap();
    let mut service = open_service(&conn);
    let before = service.cards().to_vec();

    let after = service.remove_card(&CardId::from("missing"));
    assert_eq!(after, before.as_slice());
}

#[test]
fn save_failure_keeps_in_memory_state() {
    let conn = open_db_in_memory().unwrap();
    let mut service = open_service(&conn);
    conn.execute_batch(
        "CREATE TRIGGER reject_kv_update BEFORE UPDATE ON kv_entries
         BEGIN SELECT RAISE(ABORT, 'storage quota exceeded'); END;",
    )
    .unwrap();

    let cards = service.add_card("Journal").unwrap();
    assert_eq!(cards.len(), 6);
    assert!(matches!(
        service.last_save_error(),
        Some(StoreError::Db(_))
    ));

    conn.execute_batch("DROP TRIGGER reject_kv_update;").unwrap();
    let id = service.cards()[0].id.clone();
    service.toggle_entry(&id, 0).unwrap();
    assert!(service.last_save_error().is_none());

    let reloaded = service.load();
    assert_eq!(reloaded.len(), 6);
    assert!(reloaded[0].entries[0]);
}

#[test]
fn unreadable_store_degrades_to_defaults() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch("DROP TABLE kv_entries;").unwrap();

    let mut service = open_service(&conn);
    assert_eq!(service.cards().len(), 5);

    let cards = service.add_card("Journal").unwrap();
    assert_eq!(cards.len(), 6);
    assert!(service.last_save_error().is_some());
}

#[test]
fn reset_restores_defaults() {
    let conn = open_db_in_memory().unwrap();
    let mut service = open_service(&conn);
    let first = service.cards()[0].id.clone();
    service.remove_card(&first);
    service.add_card("Journal").unwrap();

    let cards = service.reset();
    assert_eq!(cards.len(), 5);
    assert_eq!(cards[0].name, "Apply for a job");
}

#[test]
fn duplicate_ids_only_update_the_first_match() {
    let conn = open_db_in_memory().unwrap();
    let doc = r#"{"json":[
        {"id":"ab","name":"Run","data":[false,false],"createdAt":"2026-10-05T12:00:00Z"},
        {"id":"ab","name":"Read","data":[true,true],"createdAt":"2026-10-05T12:00:00Z"}
    ],"meta":{"values":{"0.createdAt":["Date"],"1.createdAt":["Date"]}}}"#;
    SqliteKeyValueRepository::new(&conn)
        .put(CARDS_KEY, doc)
        .unwrap();

    let mut service = open_service(&conn);
    let id = CardId::from("ab");
    service.toggle_entry(&id, 0).unwrap();
    let cards = service.rename_card(&id, "Run far").unwrap();

    assert_eq!(card_names(cards), vec!["Run far", "Read"]);
    assert_eq!(cards[0].entries, vec![true, false]);
    assert_eq!(cards[1].entries, vec![true, true]);

    let stored = SqliteKeyValueRepository::new(&conn)
        .get(CARDS_KEY)
        .unwrap()
        .unwrap();
    let persisted = decode(&stored).unwrap();
    assert_eq!(persisted[1].name, "Read");
    assert_eq!(persisted[1].entries, vec![true, true]);
}
