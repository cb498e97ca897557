use thiserror::Error;

use crate::scoring::ValidationError;

#[derive(Debug, Error)]
pub enum InstrumentError {
    #[error("unknown instrument: {0}")]
    UnknownInstrument(String),

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("assessment is incomplete: {} of {expected} items unanswered", .missing.len())]
    Incomplete {
        /// 1-based item numbers still unanswered.
        missing: Vec<usize>,
        expected: usize,
    },

    #[error("timestamp error: {0}")]
    Timestamp(#[from] jiff::Error),
}
