use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("remote auth is not configured")]
    NotConfigured,

    #[error("auth service returned {status}: {message}")]
    Http { status: u16, message: String },

    #[error("auth transport error: {0}")]
    Transport(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage error: {0}")]
    Storage(#[from] aroha_storage::StorageError),

    #[error("background task failed: {0}")]
    Join(String),
}

impl From<ureq::Error> for AuthError {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::StatusCode(status) => AuthError::Http {
                status,
                message: "request rejected".to_string(),
            },
            other => AuthError::Transport(other.to_string()),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        AuthError::InvalidToken(e.to_string())
    }
}
