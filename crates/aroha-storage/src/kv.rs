use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::StorageError;

/// Flat string key-value persistence, the shape of a browser's per-origin
/// storage. Writes are durable once the call returns.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    fn keys(&self) -> Result<Vec<String>, StorageError>;
}

/// Volatile store, used for tests and for running without a data directory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.keys().cloned().collect())
    }
}

/// A single JSON object on disk holding every key.
///
/// The whole map is rewritten on each mutation (tmp file + rename), so a
/// crash mid-write leaves the previous version intact.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`, creating parent directories as needed.
    ///
    /// An unparseable file is moved aside to `<path>.corrupt` and the store
    /// starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }

        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(entries) => entries,
                Err(e) => {
                    let aside = path.with_extension("json.corrupt");
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "local store unreadable, moving aside and starting empty"
                    );
                    std::fs::rename(&path, &aside).map_err(|e| StorageError::io(&path, e))?;
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(StorageError::io(&path, e)),
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "local store opened");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let json = serde_json::to_vec_pretty(entries)?;
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, &json).map_err(|e| StorageError::io(&tmp_path, e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))
                .map_err(|e| StorageError::io(&tmp_path, e))?;
        }

        std::fs::rename(&tmp_path, &self.path).map_err(|e| StorageError::io(&self.path, e))?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.flush(&next)?;
        *entries = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);
        self.flush(&next)?;
        *entries = next;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.keys().cloned().collect())
    }
}
