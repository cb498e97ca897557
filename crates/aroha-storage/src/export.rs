use serde::{Deserialize, Serialize};

use aroha_core::models::assessment::AssessmentRecord;
use aroha_core::models::consent::ConsentRecord;
use aroha_core::models::locale::Locale;

use crate::error::StorageError;

/// Everything the app holds locally, as handed to the user on export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSnapshot {
    pub records: Vec<AssessmentRecord>,
    pub language: Locale,
    pub consent: Option<ConsentRecord>,
    pub export_date: jiff::Timestamp,
}

impl ExportSnapshot {
    pub fn to_json(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn parse(json: &str) -> Result<Self, StorageError> {
        Ok(serde_json::from_str(json)?)
    }
}
