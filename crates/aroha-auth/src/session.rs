use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Treat a session as expired slightly early so a call made just before
/// expiry does not race the server's clock.
const EXPIRY_LEEWAY_SECS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub expires_at: jiff::Timestamp,
    pub user: AuthUser,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("expires_at", &self.expires_at)
            .field("has_refresh_token", &self.refresh_token.is_some())
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn user_id(&self) -> &str {
        &self.user.id
    }

    pub fn is_expired(&self, now: jiff::Timestamp) -> bool {
        now.as_second() + EXPIRY_LEEWAY_SECS >= self.expires_at.as_second()
    }

    /// Build a session from a GoTrue token response, filling any gaps
    /// (user id, expiry) from the access token's own claims.
    pub fn from_token_response(resp: TokenResponse) -> Result<Self, AuthError> {
        let claims = decode_claims(&resp.access_token)?;

        let expires_at_secs = resp
            .expires_at
            .or(claims.exp)
            .or_else(|| {
                resp.expires_in
                    .map(|secs| jiff::Timestamp::now().as_second() + secs)
            })
            .ok_or_else(|| AuthError::InvalidToken("token carries no expiry".to_string()))?;
        let expires_at = jiff::Timestamp::from_second(expires_at_secs)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        let user = match resp.user {
            Some(user) => user,
            None => AuthUser {
                id: claims.sub,
                email: claims.email,
            },
        };

        Ok(Self {
            access_token: resp.access_token,
            refresh_token: resp.refresh_token.filter(|t| !t.is_empty()),
            expires_at,
            user,
        })
    }
}

/// The subset of a GoTrue `/token` or `/signup` response we use.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub user: Option<AuthUser>,
}

/// Claims read from an access token's payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Decode (not verify) the claims of a JWT.
///
/// The signing secret belongs to the backend; the client only reads its own
/// token's subject and expiry.
pub fn decode_claims(token: &str) -> Result<TokenClaims, AuthError> {
    let token_data = jsonwebtoken::dangerous::insecure_decode::<TokenClaims>(token)?;
    Ok(token_data.claims)
}
