use aroha_core::models::assessment::{AssessmentRecord, RecordOrigin};
use aroha_core::models::locale::Locale;
use aroha_core::models::severity::SeverityBand;
use aroha_core::resources::{format_phone_number, sms_link, tel_link, Resources};
use aroha_core::storage_keys;
use pretty_assertions::assert_eq;

fn record_json(locale: &str) -> String {
    format!(
        r#"{{"id":"r1","answers":[1,2,1,2,1,1,2,1,1],"total":12,"severity":"Moderate","locale":"{locale}","createdAt":"2025-03-01T10:00:00.123Z"}}"#
    )
}

#[test]
fn record_reads_local_camel_case_format() {
    let record: AssessmentRecord = serde_json::from_str(&record_json("mi")).unwrap();
    assert_eq!(record.total, 12);
    assert_eq!(record.severity, SeverityBand::Moderate);
    assert_eq!(record.locale, Locale::Mi);
    assert_eq!(record.origin, None);
    assert_eq!(record.created_at.as_millisecond() % 1000, 123);
}

#[test]
fn unknown_locale_reads_as_baseline() {
    let record: AssessmentRecord = serde_json::from_str(&record_json("xx")).unwrap();
    assert_eq!(record.locale, Locale::En);
}

#[test]
fn origin_serializes_lowercase_and_is_omitted_when_unset() {
    let mut record: AssessmentRecord = serde_json::from_str(&record_json("en")).unwrap();
    let json = serde_json::to_value(&record).unwrap();
    assert!(json.get("origin").is_none());
    assert_eq!(json["createdAt"], "2025-03-01T10:00:00.123Z");

    record.origin = Some(RecordOrigin::Cloud);
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["origin"], "cloud");
}

#[test]
fn moderately_severe_uses_spaced_label() {
    let json = serde_json::to_string(&SeverityBand::ModeratelySevere).unwrap();
    assert_eq!(json, "\"Moderately severe\"");
    assert_eq!(
        "moderately_severe".parse::<SeverityBand>().unwrap(),
        SeverityBand::ModeratelySevere
    );
    assert!("catastrophic".parse::<SeverityBand>().is_err());
}

#[test]
fn severity_order_follows_clinical_order() {
    let mut sorted = SeverityBand::ALL;
    sorted.sort();
    assert_eq!(sorted, SeverityBand::ALL);
    assert!(SeverityBand::Minimal < SeverityBand::Severe);
}

#[test]
fn locale_codes_resolve_with_fallback() {
    assert_eq!(Locale::from_code("ZH"), Some(Locale::Zh));
    assert_eq!(Locale::from_code_or_default(Some("fr")), Locale::En);
    assert_eq!(Locale::from_code_or_default(None), Locale::En);
    assert!("fr".parse::<Locale>().is_err());
}

#[test]
fn migration_keys_are_per_user_and_namespaced() {
    let key = storage_keys::migration_prompted("user-123");
    assert_eq!(key, "phq9_migration_prompted_user-123");
    assert!(storage_keys::is_app_key(&key));
    assert!(!storage_keys::is_app_key("theme"));
}

#[test]
fn emergency_resources_are_ordered_by_priority() {
    let resources = Resources::fallback();
    let names: Vec<_> = resources.emergency().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Emergency Services", "Lifeline Aotearoa", "Healthline", "Need to Talk?"]
    );
}

#[test]
fn unreadable_resources_file_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("resources.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert_eq!(Resources::load_or_fallback(Some(&path)), Resources::fallback());
}

#[test]
fn phone_formatting_and_links() {
    assert_eq!(format_phone_number("111"), "111");
    assert_eq!(format_phone_number("0800543354"), "0800 543 354");
    assert_eq!(format_phone_number("+64 9 123"), "+64 9 123");
    assert_eq!(tel_link("0800 611 116"), "tel:0800611116");
    assert_eq!(sms_link("1737"), "sms:1737");
}
