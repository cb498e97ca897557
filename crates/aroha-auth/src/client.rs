use std::time::Duration;

use crate::error::AuthError;

/// Upper bound on any single remote call; a timeout reads as "remote
/// unavailable" like every other failure.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Build the HTTP agent shared by auth and table calls.
///
/// Non-2xx responses are returned as responses rather than errors so the
/// caller can read the service's error body.
pub fn build_agent() -> ureq::Agent {
    ureq::Agent::config_builder()
        .timeout_global(Some(REQUEST_TIMEOUT))
        .http_status_as_error(false)
        .build()
        .into()
}

/// Run a blocking HTTP exchange off the async runtime.
pub async fn blocking<T, F>(f: F) -> Result<T, AuthError>
where
    F: FnOnce() -> Result<T, AuthError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AuthError::Join(e.to_string()))?
}

/// Pull a human-readable message out of a GoTrue / PostgREST error body.
pub fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.trim().chars().take(200).collect();
    };
    ["error_description", "msg", "message", "error"]
        .iter()
        .find_map(|field| value.get(*field).and_then(|v| v.as_str()))
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().chars().take(200).collect())
}
