//! aroha-export
//!
//! Assessment history report: summary statistics and a per-record table,
//! rendered through a Tera template to Markdown and packed as DOCX.

pub mod docx;
pub mod error;
pub mod labels;
pub mod render;
pub mod report;
pub mod styles;

pub use crate::error::ExportError;
pub use crate::report::HistoryReport;

use aroha_core::models::assessment::AssessmentRecord;
use aroha_core::models::locale::Locale;

/// Markdown history report for `records` (any order; the input is not
/// reordered).
pub fn report_markdown(
    records: &[AssessmentRecord],
    locale: Locale,
    exported_at: jiff::Timestamp,
) -> Result<String, ExportError> {
    let report = HistoryReport::build(records, locale, exported_at)?;
    render::render_report(&report)
}

/// The same report as a DOCX document.
pub fn report_docx(
    records: &[AssessmentRecord],
    locale: Locale,
    exported_at: jiff::Timestamp,
) -> Result<Vec<u8>, ExportError> {
    let markdown = report_markdown(records, locale, exported_at)?;
    docx::generate_docx(&markdown, &styles::DocumentStyles::default())
}

/// `phq9-summary-YYYY-MM-DD.<extension>`, dated in UTC.
pub fn report_file_name(exported_at: jiff::Timestamp, extension: &str) -> String {
    format!("phq9-summary-{}.{extension}", exported_at.strftime("%Y-%m-%d"))
}
