//! Summary statistics over a history of results, for charts and reports.

use std::collections::BTreeMap;

use jiff::tz::TimeZone;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use aroha_core::models::assessment::AssessmentRecord;
use aroha_core::models::severity::SeverityBand;

/// A change of more than this many points counts as a trend.
const STABLE_BAND: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Trend {
    Improving,
    Worsening,
    Stable,
    InsufficientData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoreSummary {
    pub current: Option<u8>,
    pub previous: Option<u8>,
    /// Mean total, rounded to one decimal.
    pub average: f64,
    pub trend: Trend,
    pub trend_percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChartPoint {
    pub created_at: jiff::Timestamp,
    pub score: u8,
    pub severity: SeverityBand,
    /// Short UTC date label, e.g. "Mar 1".
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MonthlyAverage {
    /// `YYYY-MM`, UTC.
    pub month: String,
    pub average: f64,
    pub count: usize,
}

fn newest_first(records: &[AssessmentRecord]) -> Vec<&AssessmentRecord> {
    let mut sorted: Vec<_> = records.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn summarize(records: &[AssessmentRecord]) -> ScoreSummary {
    let sorted = newest_first(records);
    let Some(latest) = sorted.first() else {
        return ScoreSummary {
            current: None,
            previous: None,
            average: 0.0,
            trend: Trend::InsufficientData,
            trend_percentage: 0,
        };
    };

    let current = latest.total;
    let previous = sorted.get(1).map(|r| r.total);
    let sum: u32 = records.iter().map(|r| u32::from(r.total)).sum();
    let average = round1(f64::from(sum) / records.len() as f64);

    let (trend, trend_percentage) = match previous {
        None => (Trend::InsufficientData, 0),
        Some(prev) => {
            let difference = i32::from(current) - i32::from(prev);
            if difference.abs() <= STABLE_BAND {
                (Trend::Stable, 0)
            } else {
                let trend = if difference < 0 {
                    Trend::Improving
                } else {
                    Trend::Worsening
                };
                (trend, percentage_change(difference, prev))
            }
        }
    };

    ScoreSummary {
        current: Some(current),
        previous,
        average,
        trend,
        trend_percentage,
    }
}

// A rise from zero has no finite ratio; report it as 100%.
fn percentage_change(difference: i32, previous: u8) -> u32 {
    if previous == 0 {
        return 100;
    }
    (f64::from(difference.abs()) / f64::from(previous) * 100.0).round() as u32
}

/// Chart-ready points, oldest first.
pub fn chart_points(records: &[AssessmentRecord]) -> Vec<ChartPoint> {
    let mut sorted: Vec<_> = records.iter().collect();
    sorted.sort_by_key(|r| r.created_at);
    sorted
        .into_iter()
        .map(|r| ChartPoint {
            created_at: r.created_at,
            score: r.total,
            severity: r.severity,
            label: r
                .created_at
                .to_zoned(TimeZone::UTC)
                .strftime("%b %-d")
                .to_string(),
        })
        .collect()
}

/// Records created within the last `days` days of `now`.
pub fn filter_recent(
    records: &[AssessmentRecord],
    days: i64,
    now: jiff::Timestamp,
) -> Vec<AssessmentRecord> {
    let window = jiff::SignedDuration::from_hours(days.clamp(0, 1_000_000) * 24);
    let Ok(cutoff) = now.checked_sub(window) else {
        return records.to_vec();
    };
    records
        .iter()
        .filter(|r| r.created_at >= cutoff)
        .cloned()
        .collect()
}

/// Average total per UTC calendar month, oldest month first.
pub fn monthly_averages(records: &[AssessmentRecord]) -> Vec<MonthlyAverage> {
    let mut grouped: BTreeMap<String, (u32, usize)> = BTreeMap::new();
    for record in records {
        let date = record.created_at.to_zoned(TimeZone::UTC).date();
        let month = format!("{:04}-{:02}", date.year(), date.month());
        let entry = grouped.entry(month).or_default();
        entry.0 += u32::from(record.total);
        entry.1 += 1;
    }

    grouped
        .into_iter()
        .map(|(month, (sum, count))| MonthlyAverage {
            month,
            average: round1(f64::from(sum) / count as f64),
            count,
        })
        .collect()
}
