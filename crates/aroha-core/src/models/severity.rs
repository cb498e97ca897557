use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// PHQ-9 clinical severity bands, declared in increasing order so that
/// `Ord` follows clinical severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum SeverityBand {
    Minimal,
    Mild,
    Moderate,
    #[serde(rename = "Moderately severe")]
    ModeratelySevere,
    Severe,
}

impl SeverityBand {
    pub const ALL: [SeverityBand; 5] = [
        SeverityBand::Minimal,
        SeverityBand::Mild,
        SeverityBand::Moderate,
        SeverityBand::ModeratelySevere,
        SeverityBand::Severe,
    ];

    /// Label as stored in records and the remote `severity` column.
    pub fn label(self) -> &'static str {
        match self {
            SeverityBand::Minimal => "Minimal",
            SeverityBand::Mild => "Mild",
            SeverityBand::Moderate => "Moderate",
            SeverityBand::ModeratelySevere => "Moderately severe",
            SeverityBand::Severe => "Severe",
        }
    }

    /// Inclusive score range covered by the band on the 0–27 scale.
    pub fn score_range(self) -> (u8, u8) {
        match self {
            SeverityBand::Minimal => (0, 4),
            SeverityBand::Mild => (5, 9),
            SeverityBand::Moderate => (10, 14),
            SeverityBand::ModeratelySevere => (15, 19),
            SeverityBand::Severe => (20, 27),
        }
    }
}

impl fmt::Display for SeverityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SeverityBand {
    type Err = CoreError;

    /// Accepts the stored label as well as the snake_case form used by
    /// some chart payloads (`moderately_severe`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('_', " ");
        Self::ALL
            .into_iter()
            .find(|b| b.label().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| CoreError::UnknownSeverity(s.to_string()))
    }
}
