//! One-time copy of anonymous local records into a signed-in account.

use std::collections::BTreeSet;

use aroha_core::models::assessment::{AssessmentRecord, RecordOrigin};

use crate::adapter::CloudSync;
use crate::error::MigrationError;
use crate::outcome::{RemoteOutcome, Unavailable};
use crate::remote::NewRemoteRecord;

/// Per-record tally of a migration run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub migrated: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl MigrationReport {
    pub fn attempted(&self) -> usize {
        self.migrated + self.skipped + self.errors
    }
}

#[derive(Debug)]
pub enum MigrationResolution {
    Migrated(MigrationReport),
    /// The user chose to keep records local.
    Declined,
    /// Confirmed, but the remote or session went away first.
    Unavailable(Unavailable),
    /// Confirmed, but the existing-row lookup failed; nothing was inserted.
    Failed(String),
}

#[derive(Debug, Default)]
pub enum MigrationState {
    #[default]
    Idle,
    Offered {
        user_id: String,
        pending: usize,
    },
    Migrating {
        user_id: String,
    },
    Done {
        user_id: String,
        resolution: MigrationResolution,
    },
}

impl MigrationState {
    fn name(&self) -> &'static str {
        match self {
            MigrationState::Idle => "idle",
            MigrationState::Offered { .. } => "offered",
            MigrationState::Migrating { .. } => "migrating",
            MigrationState::Done { .. } => "done",
        }
    }
}

/// Drives the migration prompt. Transitions happen only on an auth change
/// or an explicit confirm/decline; there is no retry.
#[derive(Debug, Default)]
pub struct MigrationFlow {
    state: MigrationState,
}

impl MigrationFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &MigrationState {
        &self.state
    }

    /// Re-evaluate after the signed-in user changed.
    ///
    /// Offers migration when someone is signed in, at least one local record
    /// exists and this user has not been prompted before. Signing out returns
    /// the flow to `Idle`.
    pub async fn on_auth_changed(&mut self, sync: &CloudSync) -> &MigrationState {
        let Some(session) = sync.current_session().await else {
            self.state = MigrationState::Idle;
            return &self.state;
        };
        let user_id = session.user_id().to_string();

        let already_done = matches!(
            &self.state,
            MigrationState::Done { user_id: done, .. } if *done == user_id
        );
        if already_done {
            return &self.state;
        }

        let pending = sync.local().records().len();
        self.state = if pending > 0 && !sync.local().has_seen_migration_prompt(&user_id) {
            tracing::info!(user_id = %user_id, pending, "offering record migration");
            MigrationState::Offered { user_id, pending }
        } else {
            MigrationState::Idle
        };
        &self.state
    }

    /// Run the migration the user accepted. The seen flag is set whatever
    /// the outcome, so the prompt never comes back for this user.
    pub async fn confirm(&mut self, sync: &CloudSync) -> Result<&MigrationState, MigrationError> {
        let user_id = match std::mem::take(&mut self.state) {
            MigrationState::Offered { user_id, .. } => user_id,
            other => {
                let name = other.name();
                self.state = other;
                return Err(MigrationError::NotOffered(name.to_string()));
            }
        };
        self.state = MigrationState::Migrating {
            user_id: user_id.clone(),
        };

        let resolution = match sync.migrate_local_records(None).await {
            RemoteOutcome::Success(report) => MigrationResolution::Migrated(report),
            RemoteOutcome::Unavailable(reason) => MigrationResolution::Unavailable(reason),
            RemoteOutcome::Error(e) => {
                tracing::error!(error = %e, "record migration failed");
                MigrationResolution::Failed(e.to_string())
            }
        };

        self.finish(sync, user_id, resolution)
    }

    /// Keep everything local and never ask this user again.
    pub fn decline(&mut self, sync: &CloudSync) -> Result<&MigrationState, MigrationError> {
        let user_id = match std::mem::take(&mut self.state) {
            MigrationState::Offered { user_id, .. } => user_id,
            other => {
                let name = other.name();
                self.state = other;
                return Err(MigrationError::NotOffered(name.to_string()));
            }
        };
        tracing::info!(user_id = %user_id, "record migration declined");
        self.finish(sync, user_id, MigrationResolution::Declined)
    }

    fn finish(
        &mut self,
        sync: &CloudSync,
        user_id: String,
        resolution: MigrationResolution,
    ) -> Result<&MigrationState, MigrationError> {
        let marked = sync.local().set_seen_migration_prompt(&user_id);
        self.state = MigrationState::Done {
            user_id,
            resolution,
        };
        marked?;
        Ok(&self.state)
    }
}

impl CloudSync {
    /// Copy local records into the signed-in user's remote table.
    ///
    /// Existing remote `created_at` values are fetched once up front; a
    /// record already present counts as skipped, a failed insert counts as an
    /// error and the loop carries on. Migrated records are re-tagged `cloud`
    /// in the local store afterwards. Works regardless of the sync flag.
    pub async fn migrate_local_records(
        &self,
        records: Option<Vec<AssessmentRecord>>,
    ) -> RemoteOutcome<MigrationReport> {
        let records = records.unwrap_or_else(|| self.local().records());
        if records.is_empty() {
            return RemoteOutcome::Success(MigrationReport::default());
        }

        let (remote, session) = match self.connect(false).await {
            Ok(connected) => connected,
            Err(reason) => return RemoteOutcome::Unavailable(reason),
        };

        let existing: BTreeSet<jiff::Timestamp> = match remote.select_by_user(&session).await {
            Ok(rows) => rows.into_iter().map(|row| row.created_at).collect(),
            Err(e) => return RemoteOutcome::Error(e),
        };

        let mut report = MigrationReport::default();
        let mut migrated = BTreeSet::new();
        for record in &records {
            if existing.contains(&record.natural_key()) {
                report.skipped += 1;
                continue;
            }
            let row = NewRemoteRecord::from_record(record, session.user_id());
            match remote.insert(&session, row).await {
                Ok(()) => {
                    report.migrated += 1;
                    migrated.insert(record.natural_key());
                }
                Err(e) => {
                    tracing::warn!(error = %e, "record failed to migrate");
                    report.errors += 1;
                }
            }
        }

        if !migrated.is_empty() {
            self.mark_cloud(&migrated);
        }

        tracing::info!(
            user_id = %session.user_id(),
            migrated = report.migrated,
            skipped = report.skipped,
            errors = report.errors,
            "record migration finished"
        );
        RemoteOutcome::Success(report)
    }

    fn mark_cloud(&self, keys: &BTreeSet<jiff::Timestamp>) {
        let mut stored = self.local().records();
        for record in stored.iter_mut() {
            if keys.contains(&record.natural_key()) {
                record.origin = Some(RecordOrigin::Cloud);
            }
        }
        if let Err(e) = self.local().replace_records(&stored) {
            tracing::warn!(error = %e, "could not update origin of migrated records");
        }
    }
}
