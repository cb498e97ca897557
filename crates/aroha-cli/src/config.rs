use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use aroha_auth::SupabaseConfig;
use aroha_auth::config::redact_key;

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

pub const ENV_SUPABASE_URL: &str = "AROHA_SUPABASE_URL";
pub const ENV_SUPABASE_ANON_KEY: &str = "AROHA_SUPABASE_ANON_KEY";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArohaConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    /// Remote backend. Added as a nested object in v1; v0 kept the two
    /// fields at the top level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supabase: Option<RemoteSettings>,
    /// Crisis resources file overriding the built-in list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources_path: Option<PathBuf>,
}

#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteSettings {
    pub url: String,
    pub anon_key: String,
}

impl std::fmt::Debug for RemoteSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteSettings")
            .field("url", &self.url)
            .field("anon_key", &redact_key(&self.anon_key))
            .finish()
    }
}

/// Redacted config info safe to print.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigInfo {
    pub path: String,
    pub remote_configured: bool,
    pub remote_source: &'static str,
    pub url: Option<String>,
    pub anon_key_hint: Option<String>,
    pub store_path: String,
    pub resources_path: Option<String>,
}

pub fn config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("aroha"))
}

pub fn config_path() -> eyre::Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

/// Default location of the local record store.
pub fn default_store_path() -> eyre::Result<PathBuf> {
    let base = dirs::data_dir().ok_or_else(|| eyre::eyre!("no data directory found"))?;
    Ok(base.join("aroha").join("store.json"))
}

/// Load the config at `path`, or the empty default when there is none.
pub fn load_config_from(path: &Path) -> eyre::Result<ArohaConfig> {
    if !path.exists() {
        return Ok(ArohaConfig::default());
    }
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let config: ArohaConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
///
/// Each migration is a pure transform on the raw JSON value.
pub fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update Aroha."
        ));
    }

    // v0 → v1: flat supabase_url / supabase_anon_key move under `supabase`
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        let url = obj.remove("supabase_url");
        let anon_key = obj.remove("supabase_anon_key");
        if let (Some(url), Some(anon_key)) = (url, anon_key) {
            obj.insert(
                "supabase".to_string(),
                serde_json::json!({ "url": url, "anon_key": anon_key }),
            );
        }
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (nested supabase settings)");
    }

    Ok(json)
}

pub fn save_config_to(path: &Path, config: &ArohaConfig) -> eyre::Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| eyre::eyre!("config path has no parent: {}", path.display()))?;
    std::fs::create_dir_all(dir)?;

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;

    let json = serde_json::to_string_pretty(&stamped)?;

    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}

/// Remote settings after environment overrides. Each variable replaces its
/// field independently; `env` is injected so tests need not touch the
/// process environment.
pub fn resolve_remote(
    config: &ArohaConfig,
    env: impl Fn(&str) -> Option<String>,
) -> (Option<SupabaseConfig>, &'static str) {
    let file = config.supabase.clone().unwrap_or_default();
    let env_url = env(ENV_SUPABASE_URL).filter(|v| !v.trim().is_empty());
    let env_key = env(ENV_SUPABASE_ANON_KEY).filter(|v| !v.trim().is_empty());

    let source = match (&env_url, &env_key, &config.supabase) {
        (Some(_), _, _) | (_, Some(_), _) => "environment",
        (None, None, Some(_)) => "config file",
        (None, None, None) => "none",
    };

    let remote = SupabaseConfig::new(
        env_url.unwrap_or(file.url),
        env_key.unwrap_or(file.anon_key),
    );
    if remote.is_configured() {
        (Some(remote), source)
    } else {
        (None, "none")
    }
}

pub fn config_info(
    path: &Path,
    config: &ArohaConfig,
    store_path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> ConfigInfo {
    let (remote, remote_source) = resolve_remote(config, env);
    ConfigInfo {
        path: path.display().to_string(),
        remote_configured: remote.is_some(),
        remote_source,
        url: remote.as_ref().map(|r| r.url.clone()),
        anon_key_hint: remote.as_ref().map(|r| redact_key(&r.anon_key)),
        store_path: store_path.display().to_string(),
        resources_path: config
            .resources_path
            .as_ref()
            .map(|p| p.display().to_string()),
    }
}
