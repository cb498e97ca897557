use serde::{Deserialize, Serialize};

/// Connection details for the hosted backend (project URL + public anon key).
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
}

impl SupabaseConfig {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            anon_key: anon_key.into(),
        }
    }

    /// Both the URL and the key must be present for any remote call.
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty() && !self.anon_key.trim().is_empty()
    }

    fn base(&self) -> &str {
        self.url.trim().trim_end_matches('/')
    }

    pub fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.base())
    }

    pub fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base())
    }
}

impl std::fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("anon_key", &redact_key(&self.anon_key))
            .finish()
    }
}

/// `abcd...wxyz` for display; short keys are fully masked.
pub fn redact_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let prefix: String = chars[..4].iter().collect();
    let suffix: String = chars[chars.len() - 4..].iter().collect();
    format!("{prefix}...{suffix}")
}
