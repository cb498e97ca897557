//! Crisis and support contacts surfaced when a score escalates.
//!
//! A deployment may ship its own `resources.json`; anything unreadable falls
//! back to the built-in Aotearoa New Zealand list.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CrisisResource {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub description: String,
    pub available: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OnlineResource {
    pub name: String,
    pub website: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Resources {
    pub nz: BTreeMap<String, CrisisResource>,
    pub online: BTreeMap<String, OnlineResource>,
}

/// Order in which the highest-priority contacts are shown.
const EMERGENCY_KEYS: [&str; 4] = ["emergency", "lifeline", "healthline", "needToTalk"];

impl Resources {
    pub fn from_file(path: &Path) -> Result<Self, CoreError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Load from `path`, or the built-in list if the file is absent or bad.
    pub fn load_or_fallback(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::fallback();
        };
        match Self::from_file(path) {
            Ok(resources) => resources,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to load crisis resources, using built-in list");
                Self::fallback()
            }
        }
    }

    pub fn emergency(&self) -> Vec<&CrisisResource> {
        EMERGENCY_KEYS
            .iter()
            .filter_map(|key| self.nz.get(*key))
            .collect()
    }

    pub fn fallback() -> Self {
        let mut nz = BTreeMap::new();
        nz.insert(
            "emergency".to_string(),
            CrisisResource {
                name: "Emergency Services".to_string(),
                phone: Some("111".to_string()),
                text: None,
                description: "For immediate life-threatening emergencies".to_string(),
                available: "24/7".to_string(),
                website: None,
            },
        );
        nz.insert(
            "lifeline".to_string(),
            CrisisResource {
                name: "Lifeline Aotearoa".to_string(),
                phone: Some("0800 543 354".to_string()),
                text: None,
                description: "Free, confidential support for anyone in distress".to_string(),
                available: "24/7".to_string(),
                website: Some("https://www.lifeline.org.nz".to_string()),
            },
        );
        nz.insert(
            "healthline".to_string(),
            CrisisResource {
                name: "Healthline".to_string(),
                phone: Some("0800 611 116".to_string()),
                text: None,
                description: "Free health advice from trained registered nurses".to_string(),
                available: "24/7".to_string(),
                website: Some("https://www.healthline.govt.nz".to_string()),
            },
        );
        nz.insert(
            "needToTalk".to_string(),
            CrisisResource {
                name: "Need to Talk?".to_string(),
                phone: Some("1737".to_string()),
                text: Some("1737".to_string()),
                description: "Free call or text to talk with a trained counsellor".to_string(),
                available: "24/7".to_string(),
                website: Some("https://1737.org.nz".to_string()),
            },
        );

        let mut online = BTreeMap::new();
        online.insert(
            "mentalHealth".to_string(),
            OnlineResource {
                name: "Mental Health Foundation NZ".to_string(),
                website: "https://www.mentalhealth.org.nz".to_string(),
                description: "Information and resources about mental health and wellbeing"
                    .to_string(),
            },
        );

        Self { nz, online }
    }
}

/// Group an 0800 number as `0800 123 456`; short codes pass through.
pub fn format_phone_number(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.len() <= 4 {
        return digits;
    }
    if digits.starts_with("0800") && digits.len() == 10 && digits.chars().all(|c| c.is_ascii_digit()) {
        return format!("{} {} {}", &digits[..4], &digits[4..7], &digits[7..]);
    }
    phone.to_string()
}

pub fn tel_link(phone: &str) -> String {
    format!("tel:{}", strip_whitespace(phone))
}

pub fn sms_link(number: &str) -> String {
    format!("sms:{}", strip_whitespace(number))
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}
