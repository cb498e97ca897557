use serde::Serialize;

use aroha_core::models::assessment::AssessmentRecord;
use aroha_core::models::locale::Locale;

use crate::error::ExportError;
use crate::labels::{self, ReportLabels};

#[derive(Debug, Serialize)]
pub struct ReportSummary {
    pub count: usize,
    /// One decimal place.
    pub average: String,
    pub latest: u8,
    /// Signed change from the oldest record, only with two or more records.
    pub change: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReportRow {
    pub number: usize,
    pub date: String,
    pub total: u8,
    pub severity: &'static str,
    pub answers: String,
}

/// Everything the history report template needs, already localized.
#[derive(Debug, Serialize)]
pub struct HistoryReport {
    pub locale: Locale,
    pub exported: String,
    pub summary: ReportSummary,
    pub rows: Vec<ReportRow>,
    pub labels: &'static ReportLabels,
}

impl HistoryReport {
    /// Build the report from a newest-first copy of `records`. The caller's
    /// slice is left in its original order.
    pub fn build(
        records: &[AssessmentRecord],
        locale: Locale,
        exported_at: jiff::Timestamp,
    ) -> Result<Self, ExportError> {
        if records.is_empty() {
            return Err(ExportError::NoRecords);
        }

        let mut sorted: Vec<&AssessmentRecord> = records.iter().collect();
        sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let rows = sorted
            .iter()
            .enumerate()
            .map(|(i, record)| ReportRow {
                number: i + 1,
                date: record.created_at.strftime("%-d %b %Y, %H:%M").to_string(),
                total: record.total,
                severity: labels::severity_label(record.severity, locale),
                answers: record
                    .answers
                    .iter()
                    .map(u8::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
            })
            .collect();

        tracing::debug!(count = sorted.len(), %locale, "history report built");

        Ok(Self {
            locale,
            exported: exported_at.strftime("%-d %B %Y").to_string(),
            summary: summarize(&sorted),
            rows,
            labels: labels::for_locale(locale),
        })
    }
}

fn summarize(newest_first: &[&AssessmentRecord]) -> ReportSummary {
    let count = newest_first.len();
    let sum: u32 = newest_first.iter().map(|r| u32::from(r.total)).sum();
    let latest = newest_first.first().map_or(0, |r| r.total);
    let oldest = newest_first.last().map_or(0, |r| r.total);

    let change = (count > 1).then(|| {
        let diff = i32::from(latest) - i32::from(oldest);
        if diff > 0 {
            format!("+{diff}")
        } else {
            diff.to_string()
        }
    });

    ReportSummary {
        count,
        average: format!("{:.1}", f64::from(sum) / count as f64),
        latest,
        change,
    }
}
