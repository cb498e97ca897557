use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ConsentRecord {
    pub has_consented: bool,
    /// Absent in objects written without a date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub consent_date: Option<jiff::Timestamp>,
}

impl ConsentRecord {
    pub fn given_now() -> Self {
        Self {
            has_consented: true,
            consent_date: Some(jiff::Timestamp::now()),
        }
    }

    pub fn revoked_now() -> Self {
        Self {
            has_consented: false,
            consent_date: Some(jiff::Timestamp::now()),
        }
    }
}
