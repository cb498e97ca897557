use aroha_core::models::assessment::{AssessmentRecord, RecordOrigin};
use aroha_core::models::locale::Locale;
use aroha_core::models::severity::SeverityBand;
use aroha_export::{ExportError, HistoryReport, report_docx, report_file_name, report_markdown};
use pretty_assertions::assert_eq;

fn record(id: &str, total: u8, severity: SeverityBand, created_at: &str) -> AssessmentRecord {
    AssessmentRecord {
        id: id.to_string(),
        answers: vec![1, 1, 1, 1, 1, 1, 1, 1, 1],
        total,
        severity,
        locale: Locale::En,
        created_at: created_at.parse().unwrap(),
        origin: Some(RecordOrigin::Local),
    }
}

fn exported_at() -> jiff::Timestamp {
    "2024-06-30T12:00:00Z".parse().unwrap()
}

fn oldest_first() -> Vec<AssessmentRecord> {
    vec![
        record("a", 20, SeverityBand::Severe, "2024-06-01T09:15:00Z"),
        record("b", 12, SeverityBand::Moderate, "2024-06-15T09:15:00Z"),
        record("c", 6, SeverityBand::Mild, "2024-06-29T09:15:00Z"),
    ]
}

#[test]
fn report_sorts_a_copy_newest_first() {
    let records = oldest_first();
    let before = records.clone();

    let report = HistoryReport::build(&records, Locale::En, exported_at()).unwrap();

    let totals: Vec<u8> = report.rows.iter().map(|r| r.total).collect();
    assert_eq!(totals, vec![6, 12, 20]);
    assert_eq!(report.rows[0].number, 1);
    assert_eq!(records, before);
}

#[test]
fn summary_statistics() {
    let report = HistoryReport::build(&oldest_first(), Locale::En, exported_at()).unwrap();

    assert_eq!(report.summary.count, 3);
    assert_eq!(report.summary.average, "12.7");
    assert_eq!(report.summary.latest, 6);
    assert_eq!(report.summary.change.as_deref(), Some("-14"));
}

#[test]
fn single_record_has_no_change_line() {
    let records = vec![record("a", 4, SeverityBand::Minimal, "2024-06-01T09:15:00Z")];

    let markdown = report_markdown(&records, Locale::En, exported_at()).unwrap();

    assert!(!markdown.contains("Change from first"));
    assert!(markdown.contains("- **Latest score:** 4 / 27"));
}

#[test]
fn markdown_contains_headings_and_rows() {
    let markdown = report_markdown(&oldest_first(), Locale::En, exported_at()).unwrap();

    assert!(markdown.starts_with("# PHQ-9 Assessment Summary"));
    assert!(markdown.contains("Exported: 30 June 2024"));
    assert!(markdown.contains("- **Change from first:** -14 points"));
    assert!(markdown.contains("| 1 | 29 Jun 2024, 09:15 | 6/27 | Mild | 1, 1, 1, 1, 1, 1, 1, 1, 1 |"));
    assert!(markdown.contains("> This tool is for informational purposes only"));
}

#[test]
fn maori_labels_and_severity() {
    let markdown = report_markdown(&oldest_first(), Locale::Mi, exported_at()).unwrap();

    assert!(markdown.starts_with("# Whakarāpopoto Aromatawai PHQ-9"));
    assert!(markdown.contains("| Wāwāhi |"));
}

#[test]
fn other_locales_fall_back_to_english() {
    let markdown = report_markdown(&oldest_first(), Locale::Zh, exported_at()).unwrap();

    assert!(markdown.starts_with("# PHQ-9 Assessment Summary"));
}

#[test]
fn empty_history_is_rejected() {
    assert!(matches!(
        report_markdown(&[], Locale::En, exported_at()),
        Err(ExportError::NoRecords)
    ));
}

#[test]
fn docx_is_a_zip_package() {
    let bytes = report_docx(&oldest_first(), Locale::En, exported_at()).unwrap();

    assert_eq!(&bytes[..2], b"PK");
}

#[test]
fn file_name_is_dated() {
    assert_eq!(report_file_name(exported_at(), "docx"), "phq9-summary-2024-06-30.docx");
}
