use std::sync::Arc;

use aroha_core::models::assessment::{AssessmentRecord, RecordOrigin};
use aroha_core::models::consent::ConsentRecord;
use aroha_core::models::locale::Locale;
use aroha_core::models::severity::SeverityBand;
use aroha_core::storage_keys;
use aroha_storage::consent::ConsentState;
use aroha_storage::export::ExportSnapshot;
use aroha_storage::{FileStore, KeyValueStore, LocalStore, MemoryStore};
use pretty_assertions::assert_eq;

fn record(n: u8) -> AssessmentRecord {
    AssessmentRecord {
        id: format!("rec-{n}"),
        answers: vec![n % 4; 9],
        total: (n % 4) * 9,
        severity: SeverityBand::Minimal,
        locale: Locale::En,
        created_at: jiff::Timestamp::from_millisecond(1_700_000_000_000 + i64::from(n)).unwrap(),
        origin: None,
    }
}

fn memory() -> (Arc<MemoryStore>, LocalStore) {
    let kv = Arc::new(MemoryStore::new());
    let store = LocalStore::new(kv.clone());
    (kv, store)
}

#[test]
fn empty_store_has_no_records() {
    let (_, store) = memory();
    assert!(store.records().is_empty());
}

#[test]
fn saved_records_read_back_in_insertion_order() {
    let (_, store) = memory();
    let saved: Vec<_> = (0..5).map(|n| store.append_record(record(n)).unwrap()).collect();

    let read = store.records();
    assert_eq!(read.len(), 5);
    assert_eq!(read, saved);
    assert_eq!(read[0].id, "rec-0");
    assert_eq!(read[4].id, "rec-4");
}

#[test]
fn saving_tags_local_origin_only_when_unset() {
    let (_, store) = memory();
    let stored = store.append_record(record(1)).unwrap();
    assert_eq!(stored.origin, Some(RecordOrigin::Local));

    let mut cloud = record(2);
    cloud.origin = Some(RecordOrigin::Cloud);
    let stored = store.append_record(cloud).unwrap();
    assert_eq!(stored.origin, Some(RecordOrigin::Cloud));
}

#[test]
fn corrupt_records_read_as_empty() {
    let (kv, store) = memory();
    kv.set(storage_keys::RECORDS, "{not valid json").unwrap();
    assert!(store.records().is_empty());

    // The store keeps working afterwards.
    store.append_record(record(1)).unwrap();
    assert_eq!(store.records().len(), 1);
}

#[test]
fn clear_records_leaves_language_and_consent() {
    let (_, store) = memory();
    store.append_record(record(1)).unwrap();
    store.set_language(Locale::Mi).unwrap();
    store.set_consent(&ConsentRecord::given_now()).unwrap();

    store.clear_records().unwrap();

    assert!(store.records().is_empty());
    assert_eq!(store.language(), Locale::Mi);
    assert!(store.consent().is_some_and(|c| c.has_consented));
}

#[test]
fn clear_all_data_returns_to_first_run_and_spares_foreign_keys() {
    let (kv, store) = memory();
    kv.set("theme", "dark").unwrap();
    store.append_record(record(1)).unwrap();
    store.set_language(Locale::Zh).unwrap();
    store.set_consent(&ConsentRecord::given_now()).unwrap();

    store.clear_all_data().unwrap();

    assert!(store.records().is_empty());
    assert_eq!(store.language(), Locale::En);
    assert_eq!(store.consent(), None);
    assert_eq!(store.consent_state(), ConsentState::Absent);
    assert_eq!(kv.get("theme").unwrap().as_deref(), Some("dark"));
}

#[test]
fn unrecognized_language_reads_as_default() {
    let (kv, store) = memory();
    kv.set(storage_keys::LANGUAGE, "klingon").unwrap();
    assert_eq!(store.language(), Locale::En);

    store.set_language(Locale::Zh).unwrap();
    assert_eq!(store.language(), Locale::Zh);
}

#[test]
fn set_consent_writes_both_representations() {
    let (kv, store) = memory();
    let consent = ConsentRecord::given_now();
    store.set_consent(&consent).unwrap();

    assert_eq!(kv.get(storage_keys::CONSENT_FLAG).unwrap().as_deref(), Some("true"));
    assert_eq!(store.consent_state(), ConsentState::Structured(consent));

    store.set_consent(&ConsentRecord::revoked_now()).unwrap();
    assert_eq!(kv.get(storage_keys::CONSENT_FLAG).unwrap().as_deref(), Some("false"));
    assert!(store.consent().is_some_and(|c| !c.has_consented));
}

#[test]
fn structured_consent_takes_precedence_over_legacy_flag() {
    let structured = r#"{"hasConsented":false,"consentDate":"2024-05-01T00:00:00Z"}"#;
    let state = ConsentState::resolve(Some(structured), Some("true"));
    assert!(matches!(state, ConsentState::Structured(ref c) if !c.has_consented));
}

#[test]
fn structured_consent_without_a_date_is_still_structured() {
    let state = ConsentState::resolve(Some(r#"{"hasConsented":true}"#), None);
    assert!(matches!(
        state,
        ConsentState::Structured(ref c) if c.has_consented && c.consent_date.is_none()
    ));

    let withdrawn = ConsentState::resolve(Some(r#"{"hasConsented":false}"#), Some("true"));
    assert!(matches!(withdrawn, ConsentState::Structured(ref c) if !c.has_consented));
}

#[test]
fn legacy_consent_representations_are_honoured() {
    assert_eq!(ConsentState::resolve(Some("true"), None), ConsentState::Legacy);
    assert_eq!(ConsentState::resolve(None, Some("true")), ConsentState::Legacy);
    assert_eq!(ConsentState::resolve(Some("garbage"), Some("true")), ConsentState::Legacy);
    assert_eq!(ConsentState::resolve(None, Some("false")), ConsentState::Absent);
    assert_eq!(ConsentState::resolve(None, None), ConsentState::Absent);
    assert!(ConsentState::Legacy.into_record().is_some_and(|c| c.has_consented));
}

#[test]
fn export_round_trips_records() {
    let (_, store) = memory();
    store.append_record(record(1)).unwrap();
    store.append_record(record(2)).unwrap();
    store.set_language(Locale::Mi).unwrap();

    let json = store.export_all_data().unwrap();
    let parsed = ExportSnapshot::parse(&json).unwrap();
    assert_eq!(parsed.records, store.records());
    assert_eq!(parsed.language, Locale::Mi);
    assert_eq!(parsed.consent, None);

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(value.get("exportDate").is_some());
    assert!(value["records"][0].get("createdAt").is_some());
}

#[test]
fn cloud_sync_and_migration_flags() {
    let (_, store) = memory();
    assert!(!store.cloud_sync_flag());
    store.set_cloud_sync_flag(true).unwrap();
    assert!(store.cloud_sync_flag());

    assert!(!store.has_seen_migration_prompt("u1"));
    store.set_seen_migration_prompt("u1").unwrap();
    assert!(store.has_seen_migration_prompt("u1"));
    assert!(!store.has_seen_migration_prompt("u2"));

    // Per-user flags survive a full wipe.
    store.clear_all_data().unwrap();
    assert!(store.has_seen_migration_prompt("u1"));
}

#[test]
fn file_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("store.json");

    {
        let store = LocalStore::new(Arc::new(FileStore::open(&path).unwrap()));
        store.append_record(record(3)).unwrap();
        store.set_language(Locale::Mi).unwrap();
    }

    let store = LocalStore::new(Arc::new(FileStore::open(&path).unwrap()));
    assert_eq!(store.records().len(), 1);
    assert_eq!(store.records()[0].id, "rec-3");
    assert_eq!(store.language(), Locale::Mi);
}

#[test]
fn corrupt_store_file_is_moved_aside() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    std::fs::write(&path, "not json at all").unwrap();

    let kv = FileStore::open(&path).unwrap();
    assert!(kv.keys().unwrap().is_empty());
    assert!(dir.path().join("store.json.corrupt").exists());

    kv.set("phq9_lang", "mi").unwrap();
    assert!(path.exists());
}

#[test]
fn failed_flush_leaves_memory_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    let kv = FileStore::open(&path).unwrap();
    kv.set("phq9_lang", "mi").unwrap();

    // A directory at the temp path makes every flush fail.
    std::fs::create_dir(dir.path().join("store.json.tmp")).unwrap();

    assert!(kv.set("phq9_consent", "true").is_err());
    assert_eq!(kv.get("phq9_consent").unwrap(), None);
    assert!(kv.remove("phq9_lang").is_err());
    assert_eq!(kv.get("phq9_lang").unwrap().as_deref(), Some("mi"));
    assert_eq!(kv.keys().unwrap(), vec!["phq9_lang".to_string()]);

    let reopened = FileStore::open(&path).unwrap();
    assert_eq!(reopened.keys().unwrap(), kv.keys().unwrap());
}
