//! Key/value blob persistence used by the notification store.
//!
//! The store only ever needs "get the blob under this key", "replace it" and
//! "remove it", so backends are modelled after a browser's local storage: a
//! flat map from string keys to string values. [`JsonFileBlobStore`] keeps the
//! whole map in a single JSON file under the user's config directory, and
//! [`InMemoryBlobStore`] backs unit tests.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;
use tracing::{error, info, warn};

use crate::{app_file_path, expand_tilde};

/// Environment variable controlling the blob file location.
pub const STORE_PATH_ENV: &str = "LEADDASH_STORE_PATH";

/// Default filename for the persisted blob map.
pub const STORE_FILE_NAME: &str = "storage.json";

/// Errors surfaced by blob store operations.
#[derive(Debug, Error)]
pub enum BlobStoreError {
    /// I/O failure while reading or writing the backing file.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization or deserialization failure.
    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Shared trait implemented by blob persistence backends.
pub trait BlobStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, BlobStoreError>;

    /// Replace the value stored under `key`.
    fn set(&self, key: &str, value: String) -> Result<(), BlobStoreError>;

    /// Remove `key` entirely. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), BlobStoreError>;
}

type BlobMap = BTreeMap<String, String>;

/// Blob map persisted as a single JSON object on disk.
pub struct JsonFileBlobStore {
    path: PathBuf,
    entries: Mutex<BlobMap>,
}

impl JsonFileBlobStore {
    /// Open the store at the provided path (or the default path when omitted).
    pub fn new<P: Into<Option<PathBuf>>>(path: P) -> Result<Self, BlobStoreError> {
        let resolved_path = resolve_store_path(path.into());
        let entries = load_blob_map(&resolved_path)?;
        Ok(Self {
            path: resolved_path,
            entries: Mutex::new(entries),
        })
    }

    /// Open the store at the default location.
    pub fn with_defaults() -> Result<Self, BlobStoreError> {
        Self::new(None::<PathBuf>)
    }

    /// Access the underlying file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save_locked(&self, entries: &BlobMap) -> Result<(), BlobStoreError> {
        let parent_directory = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent_directory)?;

        let content = serde_json::to_string_pretty(entries)?;
        let temporary_path = build_temporary_path(parent_directory);
        let mut temporary_file = fs::File::create(&temporary_path)?;
        temporary_file.write_all(content.as_bytes())?;
        temporary_file.sync_all()?;
        drop(temporary_file);

        if let Err(error) = fs::rename(&temporary_path, &self.path) {
            let _ = fs::remove_file(&temporary_path);
            return Err(error.into());
        }
        Ok(())
    }
}

impl BlobStore for JsonFileBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, BlobStoreError> {
        let entries = self.entries.lock().expect("blob store lock poisoned");
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<(), BlobStoreError> {
        let mut entries = self.entries.lock().expect("blob store lock poisoned");
        let mut updated = entries.clone();
        updated.insert(key.to_string(), value);
        self.save_locked(&updated)?;
        *entries = updated;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), BlobStoreError> {
        let mut entries = self.entries.lock().expect("blob store lock poisoned");
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut updated = entries.clone();
        updated.remove(key);
        self.save_locked(&updated)?;
        *entries = updated;
        Ok(())
    }
}

/// In-memory blob store primarily used for unit testing.
#[derive(Debug, Default)]
pub struct InMemoryBlobStore {
    entries: Mutex<BlobMap>,
}

impl InMemoryBlobStore {
    /// Create an empty in-memory blob store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for InMemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, BlobStoreError> {
        let entries = self.entries.lock().expect("blob store lock poisoned");
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<(), BlobStoreError> {
        let mut entries = self.entries.lock().expect("blob store lock poisoned");
        entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), BlobStoreError> {
        let mut entries = self.entries.lock().expect("blob store lock poisoned");
        entries.remove(key);
        Ok(())
    }
}

/// Open the JSON file store at `path` (or the default path), falling back to
/// an [`InMemoryBlobStore`] when the file exists but cannot be read.
///
/// Nothing written to the fallback survives the process.
pub fn open_or_in_memory<P: Into<Option<PathBuf>>>(path: P) -> Arc<dyn BlobStore> {
    let resolved_path = resolve_store_path(path.into());
    match JsonFileBlobStore::new(Some(resolved_path.clone())) {
        Ok(store) => {
            info!(path = %resolved_path.display(), "Opened notification storage");
            Arc::new(store)
        }
        Err(err) => {
            error!(
                path = %resolved_path.display(),
                error = %err,
                "Notification storage is unreadable; changes will only be kept in memory"
            );
            Arc::new(InMemoryBlobStore::new())
        }
    }
}

fn resolve_store_path(path: Option<PathBuf>) -> PathBuf {
    match path {
        Some(path) => expand_tilde(&path.to_string_lossy()),
        None => default_store_path(),
    }
}

/// Resolve the blob file path from `LEADDASH_STORE_PATH` or the config directory.
pub fn default_store_path() -> PathBuf {
    app_file_path(STORE_PATH_ENV, STORE_FILE_NAME)
}

fn load_blob_map(path: &Path) -> Result<BlobMap, BlobStoreError> {
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<BlobMap>(&content) {
            Ok(entries) => Ok(entries),
            Err(error) => {
                warn!(path = %path.display(), error = %error, "Failed to parse storage file; starting empty");
                Ok(BlobMap::default())
            }
        },
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(BlobMap::default()),
        Err(error) => Err(BlobStoreError::Io(error)),
    }
}

fn build_temporary_path(parent_directory: &Path) -> PathBuf {
    let process_identifier = std::process::id();
    let timestamp_nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_nanos())
        .unwrap_or_default();
    parent_directory.join(format!(".leaddash-storage-{process_identifier}-{timestamp_nanos}.tmp"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn in_memory_store_round_trip() {
        let store = InMemoryBlobStore::new();
        assert!(store.get("key").unwrap().is_none());

        store.set("key", "value".into()).unwrap();
        assert_eq!(store.get("key").unwrap().as_deref(), Some("value"));

        store.remove("key").unwrap();
        assert!(store.get("key").unwrap().is_none());
    }

    #[test]
    fn json_store_persists_entries() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");
        let store = JsonFileBlobStore::new(Some(path.clone())).unwrap();
        store.set("key", "[1,2,3]".into()).unwrap();

        drop(store);
        let reloaded = JsonFileBlobStore::new(Some(path)).unwrap();
        assert_eq!(reloaded.get("key").unwrap().as_deref(), Some("[1,2,3]"));
    }

    #[test]
    fn json_store_remove_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let store = JsonFileBlobStore::new(Some(path.clone())).unwrap();
        store.set("keep", "a".into()).unwrap();
        store.set("drop", "b".into()).unwrap();
        store.remove("drop").unwrap();
        store.remove("never-existed").unwrap();

        drop(store);
        let reloaded = JsonFileBlobStore::new(Some(path)).unwrap();
        assert_eq!(reloaded.get("keep").unwrap().as_deref(), Some("a"));
        assert!(reloaded.get("drop").unwrap().is_none());
    }

    #[test]
    fn writes_leave_no_temporary_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let store = JsonFileBlobStore::new(Some(path)).unwrap();
        store.set("key", "value".into()).unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["storage.json".to_string()]);
    }

    #[test]
    fn invalid_json_returns_empty_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "not json").unwrap();

        let store = JsonFileBlobStore::new(Some(path)).unwrap();
        assert!(store.get("key").unwrap().is_none());
    }

    #[test]
    fn failed_write_keeps_previous_value() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let store = JsonFileBlobStore::new(Some(path.clone())).unwrap();

        // A non-empty directory at the target path makes the final rename fail.
        fs::create_dir_all(path.join("occupied")).unwrap();
        assert!(store.set("key", "value".into()).is_err());
        assert!(store.get("key").unwrap().is_none());
    }

    #[test]
    fn directory_path_fails_to_open() {
        let dir = tempdir().unwrap();
        assert!(matches!(JsonFileBlobStore::new(Some(dir.path().to_path_buf())), Err(BlobStoreError::Io(_))));
    }

    #[test]
    fn unreadable_path_falls_back_to_memory() {
        let dir = tempdir().unwrap();
        let store = open_or_in_memory(Some(dir.path().to_path_buf()));

        store.set("key", "value".into()).unwrap();
        assert_eq!(store.get("key").unwrap().as_deref(), Some("value"));
        assert!(dir.path().read_dir().unwrap().next().is_none());
    }

    #[test]
    fn readable_path_opens_file_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let store = open_or_in_memory(Some(path.clone()));
        store.set("key", "value".into()).unwrap();

        let reloaded = JsonFileBlobStore::new(Some(path)).unwrap();
        assert_eq!(reloaded.get("key").unwrap().as_deref(), Some("value"));
    }

    #[test]
    fn default_path_honors_env_override() {
        let override_path = "~/custom/storage.json";
        temp_env::with_var(STORE_PATH_ENV, Some(override_path), || {
            assert_eq!(default_store_path(), expand_tilde(override_path));
        });
    }
}
