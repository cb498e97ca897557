#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use aroha_auth::{AuthError, AuthProvider, AuthUser, BoxFuture, Session};
use aroha_core::models::assessment::AssessmentRecord;
use aroha_core::models::locale::Locale;
use aroha_instruments::instruments::phq9;
use aroha_storage::{LocalStore, MemoryStore};
use aroha_sync::{CloudSync, NewRemoteRecord, RemoteRecordRow, RemoteRecordStore, SyncError};

pub const USER: &str = "user-1";

pub fn session(user_id: &str) -> Session {
    Session {
        access_token: "token".to_string(),
        refresh_token: None,
        expires_at: jiff::Timestamp::from_second(4_000_000_000).unwrap(),
        user: AuthUser {
            id: user_id.to_string(),
            email: None,
        },
    }
}

/// Auth provider whose signed-in user the test controls.
#[derive(Default)]
pub struct StaticAuth {
    session: Mutex<Option<Session>>,
}

impl StaticAuth {
    pub fn signed_in(user_id: &str) -> Arc<Self> {
        Arc::new(Self {
            session: Mutex::new(Some(session(user_id))),
        })
    }

    pub fn signed_out() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn sign_in(&self, user_id: &str) {
        *self.session.lock().unwrap() = Some(session(user_id));
    }
}

impl AuthProvider for StaticAuth {
    fn current_session(&self) -> BoxFuture<'_, Option<Session>> {
        let session = self.session.lock().unwrap().clone();
        Box::pin(async move { session })
    }

    fn sign_out(&self) -> BoxFuture<'_, Result<(), AuthError>> {
        *self.session.lock().unwrap() = None;
        Box::pin(async { Ok(()) })
    }
}

/// In-memory `phq9_records` table with failure injection.
#[derive(Default)]
pub struct MemoryRemote {
    rows: Mutex<Vec<RemoteRecordRow>>,
    pub fail_select: AtomicBool,
    pub fail_insert: AtomicBool,
    /// Fail only the insert with this zero-based attempt index.
    pub fail_insert_at: Mutex<Option<usize>>,
    pub insert_attempts: AtomicUsize,
    pub select_calls: AtomicUsize,
}

impl MemoryRemote {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn seed(&self, user_id: &str, record: &AssessmentRecord) {
        self.rows.lock().unwrap().push(RemoteRecordRow {
            id: Some(format!("remote-{}", record.id)),
            user_id: Some(user_id.to_string()),
            answers: record.answers.clone(),
            total: record.total,
            severity: record.severity.label().to_string(),
            created_at: record.created_at,
            synced_at: None,
            locale: None,
        });
    }

    pub fn rows(&self) -> Vec<RemoteRecordRow> {
        self.rows.lock().unwrap().clone()
    }

    fn server_error() -> SyncError {
        SyncError::Http {
            status: 503,
            message: "service unavailable".to_string(),
        }
    }
}

impl RemoteRecordStore for MemoryRemote {
    fn select_by_user<'a>(
        &'a self,
        session: &'a Session,
    ) -> BoxFuture<'a, Result<Vec<RemoteRecordRow>, SyncError>> {
        Box::pin(async move {
            self.select_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_select.load(Ordering::SeqCst) {
                return Err(Self::server_error());
            }
            let mut rows: Vec<_> = self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|row| row.user_id.as_deref() == Some(session.user_id()))
                .cloned()
                .collect();
            rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(rows)
        })
    }

    fn insert<'a>(
        &'a self,
        _session: &'a Session,
        row: NewRemoteRecord,
    ) -> BoxFuture<'a, Result<(), SyncError>> {
        Box::pin(async move {
            let attempt = self.insert_attempts.fetch_add(1, Ordering::SeqCst);
            let fail_here = *self.fail_insert_at.lock().unwrap() == Some(attempt);
            if self.fail_insert.load(Ordering::SeqCst) || fail_here {
                return Err(Self::server_error());
            }
            let mut rows = self.rows.lock().unwrap();
            let id = format!("row-{}", rows.len() + 1);
            rows.push(RemoteRecordRow {
                id: Some(id),
                user_id: Some(row.user_id),
                answers: row.answers,
                total: row.total,
                severity: row.severity,
                created_at: row.created_at,
                synced_at: Some(row.synced_at),
                locale: None,
            });
            Ok(())
        })
    }

    fn delete_by_user<'a>(&'a self, session: &'a Session) -> BoxFuture<'a, Result<u64, SyncError>> {
        Box::pin(async move {
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|row| row.user_id.as_deref() != Some(session.user_id()));
            Ok((before - rows.len()) as u64)
        })
    }

    fn count_by_user<'a>(&'a self, session: &'a Session) -> BoxFuture<'a, Result<u64, SyncError>> {
        Box::pin(async move {
            let rows = self.rows.lock().unwrap();
            let count = rows
                .iter()
                .filter(|row| row.user_id.as_deref() == Some(session.user_id()))
                .count();
            Ok(count as u64)
        })
    }
}

pub fn record(answers: [u8; 9], created_at: &str) -> AssessmentRecord {
    let answers: Vec<Option<u8>> = answers.iter().copied().map(Some).collect();
    let (record, _) =
        phq9::record_at(&answers, Locale::En, created_at.parse().unwrap()).unwrap();
    record
}

pub fn local_store() -> LocalStore {
    LocalStore::new(Arc::new(MemoryStore::new()))
}

/// Adapter over a fresh in-memory local store with sync switched on.
pub fn connected(remote: &Arc<MemoryRemote>, auth: &Arc<StaticAuth>) -> CloudSync {
    let sync = CloudSync::new(
        local_store(),
        Some(remote.clone() as Arc<dyn RemoteRecordStore>),
        auth.clone(),
    );
    sync.set_cloud_sync_enabled(true).unwrap();
    sync
}
