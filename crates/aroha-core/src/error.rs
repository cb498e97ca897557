use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown locale: {0}")]
    UnknownLocale(String),

    #[error("unknown severity band: {0}")]
    UnknownSeverity(String),
}
