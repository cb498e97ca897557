use serde::Serialize;

use aroha_core::models::locale::Locale;
use aroha_core::models::severity::SeverityBand;

/// Fixed report strings for one language.
#[derive(Debug, Serialize)]
pub struct ReportLabels {
    pub title: &'static str,
    pub exported: &'static str,
    pub summary: &'static str,
    pub total_assessments: &'static str,
    pub average_score: &'static str,
    pub latest_score: &'static str,
    pub change_from_first: &'static str,
    pub points: &'static str,
    pub disclaimer: &'static str,
    pub history: &'static str,
    pub date: &'static str,
    pub score: &'static str,
    pub severity: &'static str,
    pub answers: &'static str,
    pub footer: &'static str,
}

pub static EN: ReportLabels = ReportLabels {
    title: "PHQ-9 Assessment Summary",
    exported: "Exported",
    summary: "Summary Statistics",
    total_assessments: "Total assessments",
    average_score: "Average score",
    latest_score: "Latest score",
    change_from_first: "Change from first",
    points: "points",
    disclaimer: "This tool is for informational purposes only and is not a substitute for \
                 professional medical advice, diagnosis, or treatment.",
    history: "Assessment History",
    date: "Date",
    score: "Score",
    severity: "Severity",
    answers: "Answers",
    footer: "Generated by Aroha - Mental Health Support Tool",
};

pub static MI: ReportLabels = ReportLabels {
    title: "Whakarāpopoto Aromatawai PHQ-9",
    exported: "Kawea",
    summary: "Tātauranga Whakarāpopoto",
    total_assessments: "Aromatawai katoa",
    average_score: "Kaute toharite",
    latest_score: "Kaute hou rawa",
    change_from_first: "Rerekē mai i te tuatahi",
    points: "piro",
    disclaimer: "He taputapu whakamōhiotanga anake tēnei, ehara i te whakakapi mō te \
                 tohutohu rata ngaio, te taumate, te maimoatanga rānei.",
    history: "Hītori Aromatawai",
    date: "Rā",
    score: "Kaute",
    severity: "Taimaha",
    answers: "Whakautu",
    footer: "Kua hangahia e Aroha - Taputapu Tautoko Hauora Hinengaro",
};

/// Report strings exist for English and te reo Māori; anything else gets
/// English.
pub fn for_locale(locale: Locale) -> &'static ReportLabels {
    match locale {
        Locale::Mi => &MI,
        _ => &EN,
    }
}

pub fn severity_label(band: SeverityBand, locale: Locale) -> &'static str {
    match (locale, band) {
        (Locale::Mi, SeverityBand::Minimal) => "Iti rawa",
        (Locale::Mi, SeverityBand::Mild) => "Māmā",
        (Locale::Mi, SeverityBand::Moderate) => "Wāwāhi",
        (Locale::Mi, SeverityBand::ModeratelySevere) => "Taimaha Wāwāhi",
        (Locale::Mi, SeverityBand::Severe) => "Taimaha",
        _ => band.label(),
    }
}
