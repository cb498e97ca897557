use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::locale::Locale;
use crate::models::severity::SeverityBand;

/// Which store currently owns or has confirmed a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum RecordOrigin {
    Local,
    Cloud,
}

/// One completed PHQ-9 screening.
///
/// `created_at` doubles as the natural key when local and remote copies are
/// reconciled, so it is kept at millisecond precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AssessmentRecord {
    pub id: String,
    pub answers: Vec<u8>,
    pub total: u8,
    pub severity: SeverityBand,
    #[serde(default)]
    pub locale: Locale,
    pub created_at: jiff::Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub origin: Option<RecordOrigin>,
}

impl AssessmentRecord {
    /// Dedup key shared by the local store and the remote table.
    pub fn natural_key(&self) -> jiff::Timestamp {
        self.created_at
    }
}
