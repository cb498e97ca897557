//! Local key-value and remote table naming conventions.
//!
//! Pure string functions. Every local key lives under the `phq9_` namespace
//! so that clearing app data never touches keys owned by anything else.

pub const NAMESPACE: &str = "phq9_";

pub const RECORDS: &str = "phq9_records";

pub const LANGUAGE: &str = "phq9_lang";

/// Structured consent object (JSON).
pub const CONSENT: &str = "phq9_consent";

/// Legacy `"true"` / `"false"` consent flag, still written for older readers.
pub const CONSENT_FLAG: &str = "phq9_consented";

pub const CLOUD_SYNC: &str = "phq9_cloud_sync_enabled";

pub const AUTH_SESSION: &str = "phq9_auth_session";

const MIGRATION_PROMPT_PREFIX: &str = "phq9_migration_prompted_";

pub fn migration_prompted(user_id: &str) -> String {
    format!("{MIGRATION_PROMPT_PREFIX}{user_id}")
}

/// Keys removed by a full data wipe. Session and sync flags survive.
pub const USER_DATA: [&str; 4] = [RECORDS, LANGUAGE, CONSENT, CONSENT_FLAG];

pub fn is_app_key(key: &str) -> bool {
    key.starts_with(NAMESPACE)
}

/// Remote table holding mirrored assessment records.
pub const RECORDS_TABLE: &str = "phq9_records";
