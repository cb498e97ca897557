use std::sync::Arc;

use aroha_core::models::assessment::{AssessmentRecord, RecordOrigin};
use aroha_core::models::consent::ConsentRecord;
use aroha_core::models::locale::Locale;
use aroha_core::storage_keys;

use crate::consent::ConsentState;
use crate::error::StorageError;
use crate::export::ExportSnapshot;
use crate::kv::KeyValueStore;

/// Typed access to the app's local keys.
///
/// Read-modify-write on the record list is not guarded against interleaved
/// writers; callers issue one write at a time.
#[derive(Clone)]
pub struct LocalStore {
    kv: Arc<dyn KeyValueStore>,
}

impl LocalStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    pub fn kv(&self) -> &Arc<dyn KeyValueStore> {
        &self.kv
    }

    /// All local records in insertion order.
    ///
    /// Missing, unreadable or corrupt data reads as an empty list.
    pub fn records(&self) -> Vec<AssessmentRecord> {
        let raw = match self.kv.get(storage_keys::RECORDS) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::error!(error = %e, "failed to read local records");
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(error = %e, "local records are corrupt, treating as empty");
                Vec::new()
            }
        }
    }

    /// Append a record, tagging it `local` if it has no origin yet.
    /// Returns the record as stored.
    pub fn append_record(
        &self,
        mut record: AssessmentRecord,
    ) -> Result<AssessmentRecord, StorageError> {
        record.origin.get_or_insert(RecordOrigin::Local);
        let mut records = self.records();
        records.push(record.clone());
        self.replace_records(&records)?;
        tracing::debug!(count = records.len(), "record saved locally");
        Ok(record)
    }

    /// Overwrite the whole record list.
    pub fn replace_records(&self, records: &[AssessmentRecord]) -> Result<(), StorageError> {
        let json = serde_json::to_string(records)?;
        self.kv.set(storage_keys::RECORDS, &json)
    }

    /// Remove only the record list; preferences and consent are untouched.
    pub fn clear_records(&self) -> Result<(), StorageError> {
        self.kv.remove(storage_keys::RECORDS)?;
        tracing::info!("local records cleared");
        Ok(())
    }

    /// Return to first-run state: records, language and both consent
    /// representations are removed.
    pub fn clear_all_data(&self) -> Result<(), StorageError> {
        for key in storage_keys::USER_DATA {
            self.kv.remove(key)?;
        }
        tracing::info!("all local data cleared");
        Ok(())
    }

    pub fn language(&self) -> Locale {
        match self.kv.get(storage_keys::LANGUAGE) {
            Ok(code) => Locale::from_code_or_default(code.as_deref()),
            Err(e) => {
                tracing::error!(error = %e, "failed to read language preference");
                Locale::default()
            }
        }
    }

    pub fn set_language(&self, locale: Locale) -> Result<(), StorageError> {
        self.kv.set(storage_keys::LANGUAGE, locale.code())
    }

    pub fn consent_state(&self) -> ConsentState {
        let structured = self.kv.get(storage_keys::CONSENT).unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to read consent");
            None
        });
        let flag = self.kv.get(storage_keys::CONSENT_FLAG).unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to read consent flag");
            None
        });
        ConsentState::resolve(structured.as_deref(), flag.as_deref())
    }

    pub fn consent(&self) -> Option<ConsentRecord> {
        self.consent_state().into_record()
    }

    /// Write the structured object, then the legacy flag. The flag is a
    /// courtesy to older readers; failing to write it is only logged.
    pub fn set_consent(&self, consent: &ConsentRecord) -> Result<(), StorageError> {
        let json = serde_json::to_string(consent)?;
        self.kv.set(storage_keys::CONSENT, &json)?;

        let flag = if consent.has_consented { "true" } else { "false" };
        if let Err(e) = self.kv.set(storage_keys::CONSENT_FLAG, flag) {
            tracing::warn!(error = %e, "could not write legacy consent flag");
        }
        Ok(())
    }

    pub fn export_snapshot(&self) -> ExportSnapshot {
        ExportSnapshot {
            records: self.records(),
            language: self.language(),
            consent: self.consent(),
            export_date: jiff::Timestamp::now(),
        }
    }

    /// Pretty JSON of [`ExportSnapshot`], suitable for a user download.
    pub fn export_all_data(&self) -> Result<String, StorageError> {
        self.export_snapshot().to_json()
    }

    /// The stored preference only; whether the remote is configured is the
    /// sync adapter's concern.
    pub fn cloud_sync_flag(&self) -> bool {
        self.flag(storage_keys::CLOUD_SYNC)
    }

    pub fn set_cloud_sync_flag(&self, enabled: bool) -> Result<(), StorageError> {
        self.kv
            .set(storage_keys::CLOUD_SYNC, if enabled { "true" } else { "false" })
    }

    pub fn has_seen_migration_prompt(&self, user_id: &str) -> bool {
        self.flag(&storage_keys::migration_prompted(user_id))
    }

    pub fn set_seen_migration_prompt(&self, user_id: &str) -> Result<(), StorageError> {
        self.kv.set(&storage_keys::migration_prompted(user_id), "true")
    }

    fn flag(&self, key: &str) -> bool {
        match self.kv.get(key) {
            Ok(value) => value.as_deref() == Some("true"),
            Err(e) => {
                tracing::error!(key, error = %e, "failed to read flag");
                false
            }
        }
    }
}
