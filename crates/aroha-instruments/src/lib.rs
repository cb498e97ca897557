//! aroha-instruments
//!
//! Screening instrument definitions and scoring. Pure logic, no I/O.
//! Defines the items, answer ranges, completeness rules and severity
//! classification for each supported instrument, plus trend statistics
//! over a history of results.

pub mod error;
pub mod instruments;
pub mod scoring;
pub mod trend;

use scoring::{Item, ResponseOption, ScoreRange, ValidationError};

/// Trait implemented by each screening instrument.
pub trait Instrument: Send + Sync {
    /// Unique identifier for this instrument (e.g., "phq9").
    fn id(&self) -> &str;

    /// Human-readable name (e.g., "PHQ-9").
    fn name(&self) -> &str;

    /// The questions, in administration order.
    fn items(&self) -> &[Item];

    /// Labelled answer choices shared by every item.
    fn response_options(&self) -> &[ResponseOption];

    /// Valid range of a single answer.
    fn answer_range(&self) -> ScoreRange;

    /// Validate a full answer sheet. Unanswered items and values outside
    /// the answer range are both reported, one error per offending item.
    fn validate_answers(&self, answers: &[Option<u8>]) -> Vec<ValidationError> {
        let items = self.items();
        let range = self.answer_range();

        if answers.len() != items.len() {
            return vec![ValidationError {
                item_id: None,
                value: None,
                expected_range: range,
                message: format!(
                    "{}: expected {} answers, got {}",
                    self.name(),
                    items.len(),
                    answers.len()
                ),
            }];
        }

        let mut errors = Vec::new();
        for (item, answer) in items.iter().zip(answers) {
            match answer {
                None => errors.push(ValidationError {
                    item_id: Some(item.id.clone()),
                    value: None,
                    expected_range: range,
                    message: format!("{}: item {} is unanswered", self.name(), item.number),
                }),
                Some(value) if !range.contains(*value) => errors.push(ValidationError {
                    item_id: Some(item.id.clone()),
                    value: Some(*value),
                    expected_range: range,
                    message: format!(
                        "{}: item {} answer {} is outside range [{}, {}]",
                        self.name(),
                        item.number,
                        value,
                        range.min,
                        range.max,
                    ),
                }),
                Some(_) => {}
            }
        }
        errors
    }
}

/// Return all registered instruments.
pub fn all_instruments() -> Vec<Box<dyn Instrument>> {
    vec![Box::new(instruments::phq9::Phq9)]
}

/// Look up an instrument by ID.
pub fn get_instrument(id: &str) -> Option<Box<dyn Instrument>> {
    all_instruments().into_iter().find(|i| i.id() == id)
}
