use serde::{Deserialize, Serialize};

use aroha_auth::{BoxFuture, Session};
use aroha_core::models::assessment::{AssessmentRecord, RecordOrigin};
use aroha_core::models::locale::Locale;
use aroha_instruments::instruments::phq9;

use crate::error::SyncError;

/// A row of the remote `phq9_records` table as returned by select.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteRecordRow {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    pub answers: Vec<u8>,
    pub total: u8,
    pub severity: String,
    pub created_at: jiff::Timestamp,
    #[serde(default)]
    pub synced_at: Option<jiff::Timestamp>,
    /// Not part of the current table schema; read when a deployment adds it.
    #[serde(default)]
    pub locale: Option<String>,
}

impl RemoteRecordRow {
    /// Map into the common record shape, tagged `cloud`.
    ///
    /// Severity is re-derived from the total so a stale label in the table
    /// can never produce an inconsistent record.
    pub fn into_record(self) -> AssessmentRecord {
        let severity = phq9::classify(i32::from(self.total));
        if severity.label() != self.severity {
            tracing::debug!(
                stored = %self.severity,
                derived = %severity,
                "remote severity label disagrees with total, using derived band"
            );
        }

        AssessmentRecord {
            id: self.id.unwrap_or_default(),
            answers: self.answers,
            total: self.total,
            severity,
            locale: Locale::from_code_or_default(self.locale.as_deref()),
            created_at: self.created_at,
            origin: Some(RecordOrigin::Cloud),
        }
    }
}

/// Insert payload. The remote assigns `id`; `locale` is not sent because the
/// table has no such column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewRemoteRecord {
    pub user_id: String,
    pub answers: Vec<u8>,
    pub total: u8,
    pub severity: String,
    pub created_at: jiff::Timestamp,
    pub synced_at: jiff::Timestamp,
}

impl NewRemoteRecord {
    pub fn from_record(record: &AssessmentRecord, user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            answers: record.answers.clone(),
            total: record.total,
            severity: record.severity.label().to_string(),
            created_at: record.created_at,
            synced_at: jiff::Timestamp::now(),
        }
    }
}

/// The remote table, scoped to the signed-in user by row-level ownership.
pub trait RemoteRecordStore: Send + Sync {
    /// All rows owned by the session's user, newest first.
    fn select_by_user<'a>(
        &'a self,
        session: &'a Session,
    ) -> BoxFuture<'a, Result<Vec<RemoteRecordRow>, SyncError>>;

    fn insert<'a>(
        &'a self,
        session: &'a Session,
        row: NewRemoteRecord,
    ) -> BoxFuture<'a, Result<(), SyncError>>;

    /// Returns the number of rows removed.
    fn delete_by_user<'a>(&'a self, session: &'a Session) -> BoxFuture<'a, Result<u64, SyncError>>;

    fn count_by_user<'a>(&'a self, session: &'a Session) -> BoxFuture<'a, Result<u64, SyncError>>;
}
