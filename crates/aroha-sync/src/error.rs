use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("remote rejected credentials ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("remote returned {status}: {message}")]
    Http { status: u16, message: String },

    #[error("remote transport error: {0}")]
    Transport(String),

    #[error("unexpected remote response: {0}")]
    Protocol(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage error: {0}")]
    Storage(#[from] aroha_storage::StorageError),

    #[error("background task failed: {0}")]
    Join(String),
}

impl From<ureq::Error> for SyncError {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::StatusCode(status) => SyncError::Http {
                status,
                message: "request rejected".to_string(),
            },
            other => SyncError::Transport(other.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("no migration offer is pending (state: {0})")]
    NotOffered(String),

    #[error("storage error: {0}")]
    Storage(#[from] aroha_storage::StorageError),
}
