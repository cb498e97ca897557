use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

/// Defines the valid range for a single answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoreRange {
    pub min: u8,
    pub max: u8,
}

impl ScoreRange {
    pub fn contains(&self, value: u8) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// One question of an instrument.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Item {
    pub id: String,
    /// 1-based position in the questionnaire.
    pub number: usize,
    pub prompt: String,
}

/// A labelled answer choice (e.g., 2 = "More than half the days").
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ResponseOption {
    pub value: u8,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, Error)]
#[ts(export)]
#[error("{message}")]
pub struct ValidationError {
    /// `None` when the error concerns the answer sheet as a whole.
    pub item_id: Option<String>,
    pub value: Option<u8>,
    pub expected_range: ScoreRange,
    pub message: String,
}
