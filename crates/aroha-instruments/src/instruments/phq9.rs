use serde::{Deserialize, Serialize};
use ts_rs::TS;

use aroha_core::models::assessment::{AssessmentRecord, RecordOrigin};
use aroha_core::models::locale::Locale;
use aroha_core::models::severity::SeverityBand;

use crate::Instrument;
use crate::error::InstrumentError;
use crate::scoring::{Item, ResponseOption, ScoreRange};

pub const ITEM_COUNT: usize = 9;

pub const MAX_TOTAL: u8 = 27;

/// Scores at or above this prompt supportive messaging.
pub const NUDGE_THRESHOLD: i32 = 10;

/// Scores at or above this surface crisis contacts.
pub const ESCALATE_THRESHOLD: i32 = 15;

const ANSWER_RANGE: ScoreRange = ScoreRange { min: 0, max: 3 };

/// PHQ-9: Patient Health Questionnaire, nine items.
/// Each item asks about the last two weeks and is scored 0–3; total 0–27.
pub struct Phq9;

impl Instrument for Phq9 {
    fn id(&self) -> &str {
        "phq9"
    }

    fn name(&self) -> &str {
        "PHQ-9"
    }

    fn items(&self) -> &[Item] {
        static ITEMS: std::sync::LazyLock<Vec<Item>> = std::sync::LazyLock::new(|| {
            [
                "Little interest or pleasure in doing things",
                "Feeling down, depressed, or hopeless",
                "Trouble falling or staying asleep, or sleeping too much",
                "Feeling tired or having little energy",
                "Poor appetite or overeating",
                "Feeling bad about yourself, or that you are a failure or have let yourself or your family down",
                "Trouble concentrating on things, such as reading the newspaper or watching television",
                "Moving or speaking so slowly that other people could have noticed, or the opposite, being so fidgety or restless that you have been moving around a lot more than usual",
                "Thoughts that you would be better off dead, or of hurting yourself in some way",
            ]
            .into_iter()
            .enumerate()
            .map(|(i, prompt)| Item {
                id: format!("phq9_q{}", i + 1),
                number: i + 1,
                prompt: prompt.to_string(),
            })
            .collect()
        });
        &ITEMS
    }

    fn response_options(&self) -> &[ResponseOption] {
        static OPTIONS: std::sync::LazyLock<Vec<ResponseOption>> =
            std::sync::LazyLock::new(|| {
                [
                    "Not at all",
                    "Several days",
                    "More than half the days",
                    "Nearly every day",
                ]
                .into_iter()
                .zip(0u8..)
                .map(|(label, value)| ResponseOption {
                    value,
                    label: label.to_string(),
                })
                .collect()
            });
        &OPTIONS
    }

    fn answer_range(&self) -> ScoreRange {
        ANSWER_RANGE
    }
}

/// Running total for preview: unanswered items count as zero.
///
/// Deliberately separate from [`is_complete`] so a live total can be shown
/// while the form is still being filled in.
pub fn compute_total(answers: &[Option<u8>]) -> u32 {
    answers.iter().map(|a| u32::from(a.unwrap_or(0))).sum()
}

/// True iff all nine items carry an answer.
pub fn is_complete(answers: &[Option<u8>]) -> bool {
    answers.len() == ITEM_COUNT && answers.iter().all(Option::is_some)
}

/// Map a total onto its severity band. Lower bounds are inclusive.
///
/// Out-of-domain totals clamp: anything negative is `Minimal`, anything
/// above 27 is `Severe`.
pub fn classify(total: i32) -> SeverityBand {
    if total >= 20 {
        SeverityBand::Severe
    } else if total >= 15 {
        SeverityBand::ModeratelySevere
    } else if total >= 10 {
        SeverityBand::Moderate
    } else if total >= 5 {
        SeverityBand::Mild
    } else {
        SeverityBand::Minimal
    }
}

// The two predicates compare against their own thresholds rather than
// deriving from the band.
pub fn should_nudge(total: i32) -> bool {
    total >= NUDGE_THRESHOLD
}

pub fn should_escalate(total: i32) -> bool {
    total >= ESCALATE_THRESHOLD
}

/// A complete, validated answer sheet with its derived results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoredAssessment {
    pub answers: Vec<u8>,
    pub total: u8,
    pub severity: SeverityBand,
    pub nudge: bool,
    pub escalate: bool,
}

/// Score a submission. Rejects a wrong answer count, then incomplete or
/// out-of-range answer sheets, before anything is derived.
pub fn score(answers: &[Option<u8>]) -> Result<ScoredAssessment, InstrumentError> {
    if answers.len() != ITEM_COUNT {
        if let Some(error) = Phq9.validate_answers(answers).into_iter().next() {
            return Err(error.into());
        }
    }

    if !is_complete(answers) {
        let missing = answers
            .iter()
            .enumerate()
            .filter(|(_, a)| a.is_none())
            .map(|(i, _)| i + 1)
            .collect();
        return Err(InstrumentError::Incomplete {
            missing,
            expected: ITEM_COUNT,
        });
    }

    if let Some(error) = Phq9.validate_answers(answers).into_iter().next() {
        return Err(error.into());
    }

    let answers: Vec<u8> = answers.iter().map(|a| a.unwrap_or(0)).collect();
    let total = answers.iter().map(|&a| a as i32).sum::<i32>();

    Ok(ScoredAssessment {
        total: total as u8,
        severity: classify(total),
        nudge: should_nudge(total),
        escalate: should_escalate(total),
        answers,
    })
}

/// Build a new local record from a submission, stamped with the current
/// time at millisecond precision.
pub fn new_record(
    answers: &[Option<u8>],
    locale: Locale,
) -> Result<(AssessmentRecord, ScoredAssessment), InstrumentError> {
    let now = jiff::Timestamp::now();
    let created_at = jiff::Timestamp::from_millisecond(now.as_millisecond())?;
    record_at(answers, locale, created_at)
}

/// Like [`new_record`] with an explicit creation time.
pub fn record_at(
    answers: &[Option<u8>],
    locale: Locale,
    created_at: jiff::Timestamp,
) -> Result<(AssessmentRecord, ScoredAssessment), InstrumentError> {
    let scored = score(answers)?;
    let record = AssessmentRecord {
        id: uuid::Uuid::new_v4().to_string(),
        answers: scored.answers.clone(),
        total: scored.total,
        severity: scored.severity,
        locale,
        created_at,
        origin: Some(RecordOrigin::Local),
    };
    Ok((record, scored))
}
