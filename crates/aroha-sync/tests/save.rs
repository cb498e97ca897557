mod common;

use std::sync::atomic::Ordering;

use aroha_core::models::assessment::RecordOrigin;
use aroha_sync::{CloudSync, RemoteOutcome, Unavailable};
use pretty_assertions::assert_eq;

use common::{MemoryRemote, StaticAuth, USER, connected, local_store, record};

const T1: &str = "2024-05-01T08:30:00.123Z";

#[tokio::test]
async fn save_pushes_when_sync_on_and_signed_in() {
    let remote = MemoryRemote::new();
    let auth = StaticAuth::signed_in(USER);
    let sync = connected(&remote, &auth);

    let outcome = sync.save_record(record([1; 9], T1)).await.unwrap();

    assert!(outcome.push.is_success());
    assert_eq!(outcome.record.origin, Some(RecordOrigin::Local));
    let rows = remote.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].user_id.as_deref(), Some(USER));
    assert_eq!(rows[0].severity, "Mild");
    assert_eq!(rows[0].created_at, outcome.record.created_at);
}

#[tokio::test]
async fn save_stays_local_when_sync_disabled() {
    let remote = MemoryRemote::new();
    let auth = StaticAuth::signed_in(USER);
    let sync = connected(&remote, &auth);
    sync.set_cloud_sync_enabled(false).unwrap();

    let outcome = sync.save_record(record([1; 9], T1)).await.unwrap();

    assert!(matches!(
        outcome.push,
        RemoteOutcome::Unavailable(Unavailable::SyncDisabled)
    ));
    assert!(remote.rows().is_empty());
    assert_eq!(sync.records().len(), 1);
}

#[tokio::test]
async fn save_stays_local_when_signed_out() {
    let remote = MemoryRemote::new();
    let auth = StaticAuth::signed_out();
    let sync = connected(&remote, &auth);

    let outcome = sync.save_record(record([1; 9], T1)).await.unwrap();

    assert!(matches!(
        outcome.push,
        RemoteOutcome::Unavailable(Unavailable::NoSession)
    ));
    assert_eq!(remote.insert_attempts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn remote_failure_does_not_fail_local_save() {
    let remote = MemoryRemote::new();
    remote.fail_insert.store(true, Ordering::SeqCst);
    let auth = StaticAuth::signed_in(USER);
    let sync = connected(&remote, &auth);

    let outcome = sync.save_record(record([2; 9], T1)).await.unwrap();

    assert!(matches!(outcome.push, RemoteOutcome::Error(_)));
    assert_eq!(sync.records(), vec![outcome.record]);
}

#[tokio::test]
async fn local_only_adapter_ignores_the_sync_flag() {
    let sync = CloudSync::local_only(local_store());
    sync.set_cloud_sync_enabled(true).unwrap();

    assert!(!sync.is_cloud_sync_enabled());
    let outcome = sync.save_record(record([0; 9], T1)).await.unwrap();
    assert!(matches!(
        outcome.push,
        RemoteOutcome::Unavailable(Unavailable::NotConfigured)
    ));
    assert_eq!(sync.records().len(), 1);
}

#[tokio::test]
async fn remote_cleanup_deletes_only_own_rows() {
    let remote = MemoryRemote::new();
    let auth = StaticAuth::signed_in(USER);
    let sync = connected(&remote, &auth);
    remote.seed(USER, &record([1; 9], T1));
    remote.seed(USER, &record([2; 9], "2024-05-02T08:30:00Z"));
    remote.seed("someone-else", &record([3; 9], T1));

    assert_eq!(sync.remote_record_count().await.success(), Some(2));
    assert_eq!(sync.delete_remote_records().await.success(), Some(2));
    assert_eq!(sync.remote_record_count().await.success(), Some(0));
    assert_eq!(remote.rows().len(), 1);
}

#[tokio::test]
async fn diagnose_reports_reachable_remote() {
    let remote = MemoryRemote::new();
    let auth = StaticAuth::signed_in(USER);
    let sync = connected(&remote, &auth);
    remote.seed(USER, &record([1; 9], T1));

    let report = sync.diagnose().await;

    assert!(report.is_healthy());
    assert_eq!(report.remote_count, Some(1));
}

#[tokio::test]
async fn diagnose_without_backend() {
    let report = CloudSync::local_only(local_store()).diagnose().await;

    assert!(!report.configured);
    assert!(!report.can_read);
    assert_eq!(report.errors.len(), 1);
}

#[test]
fn content_range_totals() {
    use aroha_sync::postgrest::parse_content_range_total;

    assert_eq!(parse_content_range_total("0-9/42"), Some(42));
    assert_eq!(parse_content_range_total("*/0"), Some(0));
    assert_eq!(parse_content_range_total("0-9/*"), None);
}
