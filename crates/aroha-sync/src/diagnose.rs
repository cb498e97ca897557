use crate::adapter::CloudSync;
use crate::error::SyncError;
use crate::outcome::{RemoteOutcome, Unavailable};

/// Read-only health check of the remote setup. Inserts nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionReport {
    pub configured: bool,
    pub authenticated: bool,
    pub can_read: bool,
    pub remote_count: Option<u64>,
    pub errors: Vec<String>,
}

impl ConnectionReport {
    pub fn is_healthy(&self) -> bool {
        self.configured && self.authenticated && self.can_read && self.errors.is_empty()
    }
}

impl CloudSync {
    pub async fn diagnose(&self) -> ConnectionReport {
        let mut report = ConnectionReport {
            configured: self.is_remote_configured(),
            ..ConnectionReport::default()
        };
        if !report.configured {
            report
                .errors
                .push("remote backend URL or anon key is not set".to_string());
            return report;
        }

        match self.remote_record_count().await {
            RemoteOutcome::Success(count) => {
                report.authenticated = true;
                report.can_read = true;
                report.remote_count = Some(count);
            }
            RemoteOutcome::Unavailable(Unavailable::NoSession) => {
                report.errors.push("not signed in".to_string());
            }
            RemoteOutcome::Unavailable(reason) => report.errors.push(reason.to_string()),
            RemoteOutcome::Error(e) => {
                report.authenticated = !matches!(e, SyncError::Unauthorized { .. });
                report.errors.push(describe(&e));
            }
        }

        tracing::debug!(
            configured = report.configured,
            authenticated = report.authenticated,
            can_read = report.can_read,
            "connection diagnosed"
        );
        report
    }
}

const MISSING_TABLE: &str = "phq9_records table not found; run the schema setup";

/// Error text with a hint for the common setup mistakes.
fn describe(e: &SyncError) -> String {
    let hint = match e {
        SyncError::Unauthorized { .. } => Some("session rejected; sign in again"),
        SyncError::Http { status: 404, .. } => Some(MISSING_TABLE),
        SyncError::Http { message, .. }
            if message.contains("42P01") || message.contains("does not exist") =>
        {
            Some(MISSING_TABLE)
        }
        SyncError::Http { message, .. }
            if message.contains("42501") || message.contains("permission denied") =>
        {
            Some("row-level security policies are missing for phq9_records")
        }
        _ => None,
    };
    match hint {
        Some(hint) => format!("{e} ({hint})"),
        None => e.to_string(),
    }
}
