use crate::error::SyncError;

/// Why a remote operation was skipped. Each of these is an expected,
/// first-class state of a local-first app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unavailable {
    /// No backend URL/key available to this build.
    NotConfigured,
    /// The user has cloud sync switched off.
    SyncDisabled,
    /// Nobody is signed in.
    NoSession,
}

impl std::fmt::Display for Unavailable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Unavailable::NotConfigured => "remote not configured",
            Unavailable::SyncDisabled => "cloud sync disabled",
            Unavailable::NoSession => "not signed in",
        })
    }
}

/// Result of a best-effort remote call.
#[derive(Debug)]
pub enum RemoteOutcome<T> {
    Success(T),
    Unavailable(Unavailable),
    Error(SyncError),
}

impl<T> RemoteOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, RemoteOutcome::Success(_))
    }

    pub fn success(self) -> Option<T> {
        match self {
            RemoteOutcome::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RemoteOutcome<U> {
        match self {
            RemoteOutcome::Success(value) => RemoteOutcome::Success(f(value)),
            RemoteOutcome::Unavailable(reason) => RemoteOutcome::Unavailable(reason),
            RemoteOutcome::Error(e) => RemoteOutcome::Error(e),
        }
    }
}

impl<T> From<Result<T, SyncError>> for RemoteOutcome<T> {
    fn from(result: Result<T, SyncError>) -> Self {
        match result {
            Ok(value) => RemoteOutcome::Success(value),
            Err(e) => RemoteOutcome::Error(e),
        }
    }
}
