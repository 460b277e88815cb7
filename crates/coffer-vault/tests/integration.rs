//! Integration tests for the coffer-vault crate.
//!
//! Each test drives a [`RecordStore`] through the public API only, the way
//! the CLI does: mutate, export, re-import, back up and restore.

use std::collections::HashSet;

use chrono::{DateTime, TimeZone, Utc};
use coffer_vault::{
    BackupSnapshot, Confirmation, FolderFilter, Format, GuardOutcome, NewRecord, RecordFilter,
    RecordId, RecordPatch, RecordStore, RecordType, VaultError, VaultRecord,
};

fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn sample_store() -> RecordStore {
    let mut store = RecordStore::new();
    store
        .add(NewRecord {
            username: "bob".into(),
            password: "s3cret".into(),
            url: Some("https://acme.example".into()),
            folder: Some("Work".into()),
            ..NewRecord::named("Acme")
        })
        .unwrap();
    store
        .add(NewRecord {
            record_type: RecordType::Note,
            notes: Some("line one\nline \"two\", with comma".into()),
            ..NewRecord::named("Safe, \"deposit\" box")
        })
        .unwrap();
    store
        .add(NewRecord {
            record_type: RecordType::SshKey,
            password: "-----BEGIN KEY-----".into(),
            ..NewRecord::named("Build server")
        })
        .unwrap();
    store
}

fn ids(store: &RecordStore) -> HashSet<RecordId> {
    store.list().iter().map(|r| r.id.clone()).collect()
}

// ═══════════════════════════════════════════════════════════════════════
//  Store lifecycle
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn ids_stay_unique_through_every_operation() {
    let mut store = sample_store();
    let first = store.list()[0].clone();

    store.import(store.list().to_vec());
    assert_eq!(store.len(), 6);
    assert_eq!(ids(&store).len(), 6);

    let snapshot = store.backup();
    store.import(snapshot.records().to_vec());
    assert_eq!(ids(&store).len(), 12);

    store.delete(&first.id);
    assert_eq!(ids(&store).len(), 11);
}

#[test]
fn edit_then_filter() {
    let mut store = sample_store();
    let acme = store.list()[0].id.clone();

    store
        .edit(
            &acme,
            RecordPatch {
                folder: Some(String::new()),
                favorite: Some(true),
                ..RecordPatch::default()
            },
        )
        .unwrap()
        .unwrap();

    let favorites = store.filter(&RecordFilter::new().favorites());
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].name, "Acme");

    let unfiled = store.filter(&RecordFilter::new().in_folder(FolderFilter::Unfiled));
    assert_eq!(unfiled.len(), 3);

    let blank = store.edit(
        &acme,
        RecordPatch {
            name: Some("   ".into()),
            ..RecordPatch::default()
        },
    );
    assert!(matches!(blank, Err(VaultError::EmptyName)));
    assert_eq!(store.get(&acme).unwrap().name, "Acme");
}

#[test]
fn toggle_twice_is_identity_on_flag() {
    let mut store = sample_store();
    let id = store.list()[1].id.clone();
    let before = store.get(&id).unwrap().clone();

    store.toggle_favorite(&id);
    store.toggle_favorite(&id);

    let after = store.get(&id).unwrap();
    assert_eq!(after.favorite, before.favorite);
    assert!(after.updated_at > before.updated_at);
}

// ═══════════════════════════════════════════════════════════════════════
//  Import / export
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn json_round_trip_preserves_everything() {
    let store = sample_store();
    let json = store.export(Format::Json).unwrap();

    let mut copy = RecordStore::new();
    let summary = copy.import_from(&json, Format::Json).unwrap();

    assert_eq!(summary.imported, 3);
    assert_eq!(summary.reassigned, 0);
    assert_eq!(copy.list(), store.list());
}

#[test]
fn csv_round_trip_preserves_content() {
    let store = sample_store();
    let csv = store.export(Format::Csv).unwrap();

    let mut copy = RecordStore::new();
    copy.import_from(&csv, Format::Csv).unwrap();

    assert_eq!(copy.len(), store.len());
    for (a, b) in store.list().iter().zip(copy.list()) {
        assert!(a.same_content(b), "{a:?} vs {b:?}");
        assert_eq!(a.created_at, b.created_at);
        assert_eq!(a.updated_at, b.updated_at);
    }
}

#[test]
fn csv_import_of_exported_line() {
    let content = "name,username,password,url,notes,type,folder,favorite,createdAt,updatedAt\n\
        \"Acme\",\"bob\",\"s3cret\",\"\",\"\",\"login\",\"\",false,\"2024-01-01T00:00:00.000Z\",\"2024-01-01T00:00:00.000Z\"\n";

    let mut store = RecordStore::new();
    store.import_from(content, Format::Csv).unwrap();

    let record = &store.list()[0];
    assert_eq!(record.name, "Acme");
    assert_eq!(record.username, "bob");
    assert_eq!(record.password, "s3cret");
    assert_eq!(record.record_type, RecordType::Login);
    assert!(!record.favorite);
    assert_eq!(record.created_at, epoch());
}

#[test]
fn import_keeps_existing_records_on_collision() {
    let mut store = sample_store();
    let existing = store.list()[0].clone();

    let json = format!(
        r#"[{{"id": "{}", "name": "Intruder"}}, {{"name": "Fresh"}}]"#,
        existing.id
    );
    let summary = store.import_from(&json, Format::Json).unwrap();

    assert_eq!(summary.imported, 2);
    assert_eq!(summary.reassigned, 1);
    assert_eq!(store.get(&existing.id).unwrap().name, "Acme");
    assert_eq!(store.len(), 5);
    assert_eq!(ids(&store).len(), 5);
}

#[test]
fn failed_import_leaves_store_untouched() {
    let mut store = sample_store();
    let before = store.list().to_vec();

    assert!(store.import_from("name,user\n\"broken", Format::Csv).is_err());
    assert!(store.import_from(r#"[{"name": "ok"}, {"name": ""}]"#, Format::Json).is_err());
    assert!(matches!(
        store.import_from("[]", Format::Json),
        Err(VaultError::NoRecords)
    ));

    assert_eq!(store.list(), before.as_slice());
}

// ═══════════════════════════════════════════════════════════════════════
//  Backup / restore
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn restore_replaces_whole_collection() {
    let three = sample_store();
    let backup_json = three.backup().to_json().unwrap();

    let mut store = RecordStore::new();
    for i in 0..5 {
        store.add(NewRecord::named(format!("r{i}"))).unwrap();
    }

    let snapshot = BackupSnapshot::from_json(&backup_json, Utc::now()).unwrap();
    assert_eq!(snapshot.metadata().item_count, 3);

    assert_eq!(
        store.restore(snapshot.clone(), Confirmation::Declined),
        GuardOutcome::Declined
    );
    assert_eq!(store.len(), 5);

    assert_eq!(
        store.restore(snapshot, Confirmation::Confirmed),
        GuardOutcome::Applied { affected: 3 }
    );
    assert_eq!(store.list(), three.list());
}

#[test]
fn restore_repairs_duplicate_ids_in_backup() {
    let record = VaultRecord::from_new(NewRecord::named("a"), RecordId::from("same"), epoch())
        .unwrap();
    let snapshot = BackupSnapshot::capture(&[record.clone(), record], epoch());

    let mut store = RecordStore::new();
    store.restore(snapshot, Confirmation::Confirmed);

    assert_eq!(store.len(), 2);
    assert_eq!(ids(&store).len(), 2);
}

#[test]
fn backup_without_items_is_rejected() {
    let err = BackupSnapshot::from_json(r#"{"records": []}"#, Utc::now()).unwrap_err();
    assert!(matches!(err, VaultError::InvalidBackup { .. }));
}
