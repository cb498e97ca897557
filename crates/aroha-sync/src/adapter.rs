use std::sync::Arc;

use aroha_auth::{AuthProvider, Session, SignedOut};
use aroha_core::models::assessment::AssessmentRecord;
use aroha_storage::{LocalStore, StorageError};

use crate::merge::merge_records;
use crate::outcome::{RemoteOutcome, Unavailable};
use crate::remote::{NewRemoteRecord, RemoteRecordStore};

/// A local save, plus what happened to the optional remote push.
#[derive(Debug)]
pub struct SaveOutcome {
    pub record: AssessmentRecord,
    pub push: RemoteOutcome<()>,
}

/// Local record store with an optional remote mirror.
pub struct CloudSync {
    local: LocalStore,
    remote: Option<Arc<dyn RemoteRecordStore>>,
    auth: Arc<dyn AuthProvider>,
}

impl CloudSync {
    /// `remote` is `None` when the build has no backend configured.
    pub fn new(
        local: LocalStore,
        remote: Option<Arc<dyn RemoteRecordStore>>,
        auth: Arc<dyn AuthProvider>,
    ) -> Self {
        Self {
            local,
            remote,
            auth,
        }
    }

    pub fn local_only(local: LocalStore) -> Self {
        Self::new(local, None, Arc::new(SignedOut))
    }

    pub fn local(&self) -> &LocalStore {
        &self.local
    }

    pub fn is_remote_configured(&self) -> bool {
        self.remote.is_some()
    }

    /// The stored preference AND a configured remote. Without a remote the
    /// app is local-only whatever the flag says.
    pub fn is_cloud_sync_enabled(&self) -> bool {
        self.local.cloud_sync_flag() && self.is_remote_configured()
    }

    pub fn set_cloud_sync_enabled(&self, enabled: bool) -> Result<(), StorageError> {
        self.local.set_cloud_sync_flag(enabled)?;
        tracing::info!(enabled, "cloud sync preference updated");
        Ok(())
    }

    pub fn records(&self) -> Vec<AssessmentRecord> {
        self.local.records()
    }

    pub async fn current_session(&self) -> Option<Session> {
        self.auth.current_session().await
    }

    pub async fn sign_out(&self) -> Result<(), aroha_auth::AuthError> {
        self.auth.sign_out().await
    }

    /// Resolve the remote and session for a call, or say why there is none.
    pub(crate) async fn connect(
        &self,
        require_sync_flag: bool,
    ) -> Result<(&dyn RemoteRecordStore, Session), Unavailable> {
        let Some(remote) = self.remote.as_deref() else {
            return Err(Unavailable::NotConfigured);
        };
        if require_sync_flag && !self.local.cloud_sync_flag() {
            return Err(Unavailable::SyncDisabled);
        }
        let Some(session) = self.auth.current_session().await else {
            return Err(Unavailable::NoSession);
        };
        Ok((remote, session))
    }

    /// Persist locally, then push when sync is on and someone is signed in.
    ///
    /// The local write completes before the push starts and is the only
    /// part that can fail the call.
    pub async fn save_record(&self, record: AssessmentRecord) -> Result<SaveOutcome, StorageError> {
        let record = self.local.append_record(record)?;

        let push = match self.connect(true).await {
            Err(reason) => {
                tracing::debug!(%reason, "record kept local only");
                RemoteOutcome::Unavailable(reason)
            }
            Ok((remote, session)) => {
                let row = NewRemoteRecord::from_record(&record, session.user_id());
                match remote.insert(&session, row).await {
                    Ok(()) => {
                        tracing::debug!(user_id = %session.user_id(), "record pushed to remote");
                        RemoteOutcome::Success(())
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "failed to push record, local copy is safe");
                        RemoteOutcome::Error(e)
                    }
                }
            }
        };

        Ok(SaveOutcome { record, push })
    }

    pub async fn try_fetch_remote_records(&self) -> RemoteOutcome<Vec<AssessmentRecord>> {
        let (remote, session) = match self.connect(true).await {
            Ok(connected) => connected,
            Err(reason) => return RemoteOutcome::Unavailable(reason),
        };

        let rows: RemoteOutcome<_> = remote.select_by_user(&session).await.into();
        rows.map(|rows| rows.into_iter().map(|row| row.into_record()).collect())
    }

    /// Remote records for the signed-in user; empty when unavailable or on
    /// any remote error.
    pub async fn fetch_remote_records(&self) -> Vec<AssessmentRecord> {
        match self.try_fetch_remote_records().await {
            RemoteOutcome::Success(records) => records,
            RemoteOutcome::Unavailable(reason) => {
                tracing::debug!(%reason, "remote records unavailable");
                Vec::new()
            }
            RemoteOutcome::Error(e) => {
                tracing::error!(error = %e, "failed to fetch remote records");
                Vec::new()
            }
        }
    }

    /// Local and remote records reconciled on `created_at`, newest first.
    ///
    /// With sync off the local list is returned as stored. With sync on, an
    /// unavailable or failing remote contributes nothing, so the result is
    /// the local list in the same newest-first order.
    pub async fn get_merged_records(&self) -> Vec<AssessmentRecord> {
        let local = self.local.records();
        if !self.is_cloud_sync_enabled() {
            return local;
        }

        let remote = match self.try_fetch_remote_records().await {
            RemoteOutcome::Success(remote) => remote,
            RemoteOutcome::Unavailable(reason) => {
                tracing::debug!(%reason, "merging local records only");
                Vec::new()
            }
            RemoteOutcome::Error(e) => {
                tracing::warn!(error = %e, "remote fetch failed, merging local records only");
                Vec::new()
            }
        };

        let merged = merge_records(local, remote);
        tracing::debug!(count = merged.len(), "records merged");
        merged
    }

    pub async fn remote_record_count(&self) -> RemoteOutcome<u64> {
        match self.connect(false).await {
            Ok((remote, session)) => remote.count_by_user(&session).await.into(),
            Err(reason) => RemoteOutcome::Unavailable(reason),
        }
    }

    /// Delete every remote row owned by the signed-in user.
    pub async fn delete_remote_records(&self) -> RemoteOutcome<u64> {
        match self.connect(false).await {
            Ok((remote, session)) => {
                let outcome: RemoteOutcome<u64> = remote.delete_by_user(&session).await.into();
                if let RemoteOutcome::Success(count) = &outcome {
                    tracing::info!(user_id = %session.user_id(), count, "remote records deleted");
                }
                outcome
            }
            Err(reason) => RemoteOutcome::Unavailable(reason),
        }
    }
}
