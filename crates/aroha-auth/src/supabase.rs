use std::sync::Arc;

use aroha_core::storage_keys;
use aroha_storage::KeyValueStore;

use crate::client::{self, blocking};
use crate::config::SupabaseConfig;
use crate::error::AuthError;
use crate::provider::{AuthProvider, BoxFuture};
use crate::session::Session;

/// GoTrue client with the session kept in the local key-value store.
pub struct SupabaseAuth {
    config: SupabaseConfig,
    agent: ureq::Agent,
    kv: Arc<dyn KeyValueStore>,
}

impl SupabaseAuth {
    pub fn new(config: SupabaseConfig, kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            config,
            agent: client::build_agent(),
            kv,
        }
    }

    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        tracing::info!("signing in with password");
        let body = serde_json::json!({ "email": email, "password": password });
        let value = self.post_auth("token", Some("password"), body, None).await?;
        let session = Session::from_token_response(serde_json::from_value(value)?)?;
        self.persist(&session)?;
        tracing::info!(user_id = %session.user.id, "signed in");
        Ok(session)
    }

    /// Register a new account. Returns `None` when the project requires
    /// email confirmation before a session is issued.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Option<Session>, AuthError> {
        tracing::info!("signing up");
        let body = serde_json::json!({ "email": email, "password": password });
        let value = self.post_auth("signup", None, body, None).await?;

        if value.get("access_token").is_none() {
            tracing::info!("sign-up pending email confirmation");
            return Ok(None);
        }
        let session = Session::from_token_response(serde_json::from_value(value)?)?;
        self.persist(&session)?;
        Ok(Some(session))
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<Session, AuthError> {
        let body = serde_json::json!({ "refresh_token": refresh_token });
        let value = self
            .post_auth("token", Some("refresh_token"), body, None)
            .await?;
        let session = Session::from_token_response(serde_json::from_value(value)?)?;
        self.persist(&session)?;
        tracing::debug!(user_id = %session.user.id, "session refreshed");
        Ok(session)
    }

    /// The persisted session, whether or not it has expired.
    pub fn stored_session(&self) -> Option<Session> {
        let raw = match self.kv.get(storage_keys::AUTH_SESSION) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read stored session");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(error = %e, "stored session unreadable, ignoring");
                None
            }
        }
    }

    fn persist(&self, session: &Session) -> Result<(), AuthError> {
        let json = serde_json::to_string(session)?;
        self.kv.set(storage_keys::AUTH_SESSION, &json)?;
        Ok(())
    }

    fn forget(&self) -> Result<(), AuthError> {
        self.kv.remove(storage_keys::AUTH_SESSION)?;
        Ok(())
    }

    async fn post_auth(
        &self,
        path: &str,
        grant_type: Option<&str>,
        body: serde_json::Value,
        bearer: Option<String>,
    ) -> Result<serde_json::Value, AuthError> {
        if !self.config.is_configured() {
            return Err(AuthError::NotConfigured);
        }

        let agent = self.agent.clone();
        let url = self.config.auth_url(path);
        let anon_key = self.config.anon_key.clone();
        let grant_type = grant_type.map(str::to_string);

        blocking(move || {
            let mut req = agent.post(&url).header("apikey", &anon_key);
            if let Some(grant_type) = &grant_type {
                req = req.query("grant_type", grant_type);
            }
            if let Some(token) = &bearer {
                req = req.header("Authorization", &format!("Bearer {token}"));
            }

            let mut resp = req.send_json(&body)?;
            let status = resp.status();
            let text = resp.body_mut().read_to_string()?;

            if !status.is_success() {
                return Err(AuthError::Http {
                    status: status.as_u16(),
                    message: client::error_message(&text),
                });
            }
            if text.trim().is_empty() {
                return Ok(serde_json::Value::Null);
            }
            Ok(serde_json::from_str(&text)?)
        })
        .await
    }
}

impl AuthProvider for SupabaseAuth {
    fn current_session(&self) -> BoxFuture<'_, Option<Session>> {
        Box::pin(async move {
            let session = self.stored_session()?;
            if !session.is_expired(jiff::Timestamp::now()) {
                return Some(session);
            }

            let refresh_token = session.refresh_token.as_deref()?;
            match self.refresh(refresh_token).await {
                Ok(fresh) => Some(fresh),
                Err(AuthError::Http { status, message }) if (400..500).contains(&status) => {
                    tracing::info!(status, %message, "refresh rejected, signing out locally");
                    if let Err(e) = self.forget() {
                        tracing::warn!(error = %e, "failed to clear rejected session");
                    }
                    None
                }
                Err(e) => {
                    tracing::warn!(error = %e, "session refresh failed");
                    None
                }
            }
        })
    }

    /// Revoke the session remotely when possible; the local copy is
    /// dropped regardless of the remote outcome.
    fn sign_out(&self) -> BoxFuture<'_, Result<(), AuthError>> {
        Box::pin(async move {
            let Some(session) = self.stored_session() else {
                return Ok(());
            };

            if let Err(e) = self
                .post_auth(
                    "logout",
                    None,
                    serde_json::json!({}),
                    Some(session.access_token.clone()),
                )
                .await
            {
                tracing::warn!(error = %e, "remote sign-out failed, clearing local session anyway");
            }

            self.forget()?;
            tracing::info!(user_id = %session.user.id, "signed out");
            Ok(())
        })
    }
}
