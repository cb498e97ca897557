use std::path::PathBuf;
use std::sync::Arc;

use aroha_auth::{AuthProvider, SignedOut, SupabaseAuth};
use aroha_core::models::locale::Locale;
use aroha_core::resources::Resources;
use aroha_storage::{FileStore, KeyValueStore, LocalStore, StorageError};
use aroha_sync::{CloudSync, PostgrestRecords, RemoteRecordStore};

use crate::config::{self, ArohaConfig};

/// The active display language, read once from the stored preference.
///
/// Only [`LocaleContext::set`] changes it, and it persists the change.
#[derive(Debug, Clone)]
pub struct LocaleContext {
    current: Locale,
}

impl LocaleContext {
    pub fn init(store: &LocalStore) -> Self {
        Self {
            current: store.language(),
        }
    }

    pub fn get(&self) -> Locale {
        self.current
    }

    pub fn set(&mut self, store: &LocalStore, locale: Locale) -> Result<(), StorageError> {
        store.set_language(locale)?;
        self.current = locale;
        Ok(())
    }
}

/// Everything a command needs, built once at start-up.
pub struct AppContext {
    pub config_path: PathBuf,
    pub config: ArohaConfig,
    pub store_path: PathBuf,
    pub locale: LocaleContext,
    pub sync: CloudSync,
    /// Present only when a remote backend is configured.
    pub auth: Option<Arc<SupabaseAuth>>,
    pub resources: Resources,
}

impl AppContext {
    pub fn open(
        config_path: PathBuf,
        store_path: Option<PathBuf>,
    ) -> eyre::Result<Self> {
        let config = config::load_config_from(&config_path)?;
        let store_path = match store_path {
            Some(path) => path,
            None => config::default_store_path()?,
        };

        let kv: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&store_path)?);
        let local = LocalStore::new(kv.clone());

        let (remote_config, source) = config::resolve_remote(&config, |k| std::env::var(k).ok());
        let (sync, auth) = match remote_config {
            Some(remote_config) => {
                tracing::debug!(source, "remote backend configured");
                let auth = Arc::new(SupabaseAuth::new(remote_config.clone(), kv));
                let remote: Arc<dyn RemoteRecordStore> =
                    Arc::new(PostgrestRecords::new(remote_config));
                let provider: Arc<dyn AuthProvider> = auth.clone();
                (CloudSync::new(local, Some(remote), provider), Some(auth))
            }
            None => {
                tracing::debug!("no remote backend, running local-only");
                (
                    CloudSync::new(local, None, Arc::new(SignedOut)),
                    None,
                )
            }
        };

        let locale = LocaleContext::init(sync.local());
        let resources = Resources::load_or_fallback(config.resources_path.as_deref());

        Ok(Self {
            config_path,
            config,
            store_path,
            locale,
            sync,
            auth,
            resources,
        })
    }

    pub fn store(&self) -> &LocalStore {
        self.sync.local()
    }

    pub fn require_auth(&self) -> eyre::Result<&SupabaseAuth> {
        self.auth.as_deref().ok_or_else(|| {
            eyre::eyre!(
                "no remote backend configured; run `aroha config set-remote` or set {} and {}",
                config::ENV_SUPABASE_URL,
                config::ENV_SUPABASE_ANON_KEY
            )
        })
    }
}
