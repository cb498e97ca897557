use aroha_auth::client::{build_agent, error_message};
use aroha_auth::{BoxFuture, Session, SupabaseConfig};
use aroha_core::storage_keys;

use crate::error::SyncError;
use crate::remote::{NewRemoteRecord, RemoteRecordRow, RemoteRecordStore};

/// `phq9_records` over the backend's PostgREST endpoint.
///
/// Every request carries the project anon key plus the user's access token,
/// so row-level security scopes it to that user.
pub struct PostgrestRecords {
    config: SupabaseConfig,
    agent: ureq::Agent,
}

struct Request {
    agent: ureq::Agent,
    url: String,
    anon_key: String,
    bearer: String,
    user_filter: String,
}

impl PostgrestRecords {
    pub fn new(config: SupabaseConfig) -> Self {
        Self {
            config,
            agent: build_agent(),
        }
    }

    fn request(&self, session: &Session) -> Request {
        Request {
            agent: self.agent.clone(),
            url: self.config.rest_url(storage_keys::RECORDS_TABLE),
            anon_key: self.config.anon_key.clone(),
            bearer: format!("Bearer {}", session.access_token),
            user_filter: format!("eq.{}", session.user_id()),
        }
    }
}

async fn blocking<T, F>(f: F) -> Result<T, SyncError>
where
    F: FnOnce() -> Result<T, SyncError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| SyncError::Join(e.to_string()))?
}

fn check_status(resp: &mut ureq::http::Response<ureq::Body>) -> Result<(), SyncError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(());
    }
    let body = resp.body_mut().read_to_string().unwrap_or_default();
    let message = error_message(&body);
    let status = status.as_u16();
    if status == 401 || status == 403 {
        Err(SyncError::Unauthorized { status, message })
    } else {
        Err(SyncError::Http { status, message })
    }
}

/// Total from a `Content-Range` header such as `0-9/42` or `*/42`.
pub fn parse_content_range_total(value: &str) -> Option<u64> {
    value.rsplit_once('/')?.1.trim().parse().ok()
}

fn content_range_total(resp: &ureq::http::Response<ureq::Body>) -> Result<u64, SyncError> {
    resp.headers()
        .get("content-range")
        .and_then(|v| v.to_str().ok())
        .and_then(parse_content_range_total)
        .ok_or_else(|| SyncError::Protocol("missing or malformed Content-Range".to_string()))
}

impl RemoteRecordStore for PostgrestRecords {
    fn select_by_user<'a>(
        &'a self,
        session: &'a Session,
    ) -> BoxFuture<'a, Result<Vec<RemoteRecordRow>, SyncError>> {
        let req = self.request(session);
        Box::pin(async move {
            let rows: Vec<RemoteRecordRow> = blocking(move || {
                let mut resp = req
                    .agent
                    .get(&req.url)
                    .header("apikey", &req.anon_key)
                    .header("Authorization", &req.bearer)
                    .query("select", "*")
                    .query("user_id", &req.user_filter)
                    .query("order", "created_at.desc")
                    .call()?;
                check_status(&mut resp)?;
                Ok(resp.body_mut().read_json()?)
            })
            .await?;
            tracing::debug!(count = rows.len(), "remote records fetched");
            Ok(rows)
        })
    }

    fn insert<'a>(
        &'a self,
        session: &'a Session,
        row: NewRemoteRecord,
    ) -> BoxFuture<'a, Result<(), SyncError>> {
        let req = self.request(session);
        Box::pin(async move {
            blocking(move || {
                let mut resp = req
                    .agent
                    .post(&req.url)
                    .header("apikey", &req.anon_key)
                    .header("Authorization", &req.bearer)
                    .header("Prefer", "return=minimal")
                    .send_json(&row)?;
                check_status(&mut resp)
            })
            .await
        })
    }

    fn delete_by_user<'a>(&'a self, session: &'a Session) -> BoxFuture<'a, Result<u64, SyncError>> {
        let req = self.request(session);
        Box::pin(async move {
            blocking(move || {
                let mut resp = req
                    .agent
                    .delete(&req.url)
                    .header("apikey", &req.anon_key)
                    .header("Authorization", &req.bearer)
                    .header("Prefer", "return=minimal,count=exact")
                    .query("user_id", &req.user_filter)
                    .call()?;
                check_status(&mut resp)?;
                content_range_total(&resp)
            })
            .await
        })
    }

    fn count_by_user<'a>(&'a self, session: &'a Session) -> BoxFuture<'a, Result<u64, SyncError>> {
        let req = self.request(session);
        Box::pin(async move {
            blocking(move || {
                let mut resp = req
                    .agent
                    .head(&req.url)
                    .header("apikey", &req.anon_key)
                    .header("Authorization", &req.bearer)
                    .header("Prefer", "count=exact")
                    .query("select", "id")
                    .query("user_id", &req.user_filter)
                    .call()?;
                check_status(&mut resp)?;
                content_range_total(&resp)
            })
            .await
        })
    }
}
