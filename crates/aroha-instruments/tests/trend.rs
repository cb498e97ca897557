use aroha_core::models::assessment::AssessmentRecord;
use aroha_core::models::locale::Locale;
use aroha_instruments::instruments::phq9::classify;
use aroha_instruments::trend::{Trend, chart_points, filter_recent, monthly_averages, summarize};
use pretty_assertions::assert_eq;

fn record(created_at: &str, total: u8) -> AssessmentRecord {
    AssessmentRecord {
        id: created_at.to_string(),
        answers: vec![0; 9],
        total,
        severity: classify(i32::from(total)),
        locale: Locale::En,
        created_at: created_at.parse().unwrap(),
        origin: None,
    }
}

#[test]
fn empty_history_has_insufficient_data() {
    let summary = summarize(&[]);
    assert_eq!(summary.current, None);
    assert_eq!(summary.trend, Trend::InsufficientData);
    assert_eq!(summary.average, 0.0);
}

#[test]
fn single_record_has_no_trend() {
    let summary = summarize(&[record("2025-01-01T00:00:00Z", 7)]);
    assert_eq!(summary.current, Some(7));
    assert_eq!(summary.previous, None);
    assert_eq!(summary.trend, Trend::InsufficientData);
}

#[test]
fn drop_of_more_than_two_points_is_improving() {
    let records = [
        record("2025-01-01T00:00:00Z", 20),
        record("2025-02-01T00:00:00Z", 10),
    ];
    let summary = summarize(&records);
    assert_eq!(summary.current, Some(10));
    assert_eq!(summary.previous, Some(20));
    assert_eq!(summary.trend, Trend::Improving);
    assert_eq!(summary.trend_percentage, 50);
    assert_eq!(summary.average, 15.0);
}

#[test]
fn rise_and_small_changes() {
    let worsening = summarize(&[
        record("2025-02-01T00:00:00Z", 12),
        record("2025-01-01T00:00:00Z", 8),
    ]);
    assert_eq!(worsening.trend, Trend::Worsening);
    assert_eq!(worsening.trend_percentage, 50);

    let stable = summarize(&[
        record("2025-01-01T00:00:00Z", 8),
        record("2025-02-01T00:00:00Z", 10),
    ]);
    assert_eq!(stable.trend, Trend::Stable);
    assert_eq!(stable.trend_percentage, 0);

    let from_zero = summarize(&[
        record("2025-01-01T00:00:00Z", 0),
        record("2025-02-01T00:00:00Z", 9),
    ]);
    assert_eq!(from_zero.trend_percentage, 100);
}

#[test]
fn average_rounds_to_one_decimal() {
    let records = [
        record("2025-01-01T00:00:00Z", 1),
        record("2025-01-02T00:00:00Z", 2),
        record("2025-01-03T00:00:00Z", 2),
    ];
    assert_eq!(summarize(&records).average, 1.7);
}

#[test]
fn chart_points_are_oldest_first_with_labels() {
    let points = chart_points(&[
        record("2025-03-15T09:00:00Z", 5),
        record("2025-03-01T09:00:00Z", 3),
    ]);
    assert_eq!(points[0].score, 3);
    assert_eq!(points[0].label, "Mar 1");
    assert_eq!(points[1].label, "Mar 15");
}

#[test]
fn recent_filter_uses_day_window() {
    let now: jiff::Timestamp = "2025-03-31T00:00:00Z".parse().unwrap();
    let records = [
        record("2025-03-30T00:00:00Z", 5),
        record("2025-01-01T00:00:00Z", 3),
    ];
    let recent = filter_recent(&records, 30, now);
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].total, 5);
}

#[test]
fn monthly_averages_group_by_utc_month() {
    let months = monthly_averages(&[
        record("2025-02-10T00:00:00Z", 9),
        record("2025-01-05T00:00:00Z", 4),
        record("2025-01-20T00:00:00Z", 5),
    ]);
    assert_eq!(months.len(), 2);
    assert_eq!(months[0].month, "2025-01");
    assert_eq!(months[0].average, 4.5);
    assert_eq!(months[0].count, 2);
    assert_eq!(months[1].month, "2025-02");
}
