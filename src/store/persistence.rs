//! # Snapshot Storage
//!
//! Durable key/value storage for store snapshots. Each store writes its whole
//! state as one JSON document under a fixed key and reads it back verbatim at
//! the next boot.

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

/// Errors raised while reading or writing snapshots.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage I/O error for '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Snapshot encoding error for '{key}': {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Raw key/value backend.
pub trait SnapshotStorage: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn save(&self, key: &str, contents: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// One `<key>.json` file per snapshot inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SnapshotStorage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn save(&self, key: &str, contents: &str) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            key: key.to_string(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(io_err)?;
        // Written to a temp file, then renamed into place.
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        fs::write(&tmp, contents).map_err(io_err)?;
        fs::rename(&tmp, self.path_for(key)).map_err(io_err)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}

/// In-process storage. Snapshots live as long as the value does.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn save(&self, key: &str, contents: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .insert(key.to_string(), contents.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// Reads and decodes the snapshot under `key`, if any.
pub fn load_snapshot<T: DeserializeOwned>(
    storage: &dyn SnapshotStorage,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let Some(contents) = storage.load(key)? else {
        return Ok(None);
    };
    let value = serde_json::from_str(&contents).map_err(|source| StorageError::Json {
        key: key.to_string(),
        source,
    })?;
    Ok(Some(value))
}

/// Encodes `value` and writes it under `key`.
pub fn save_snapshot<T: Serialize + ?Sized>(
    storage: &dyn SnapshotStorage,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let contents = serde_json::to_string(value).map_err(|source| StorageError::Json {
        key: key.to_string(),
        source,
    })?;
    storage.save(key, &contents)
}

/// Runs a store write on the blocking pool, so snapshot file I/O never runs
/// on an async worker thread. Completes once the write has been applied.
pub async fn write_blocking<S, F>(store: &Arc<S>, write: F)
where
    S: Send + Sync + ?Sized + 'static,
    F: FnOnce(&S) + Send + 'static,
{
    let store = store.clone();
    let task = tokio::task::spawn_blocking(move || write(store.as_ref()));
    if let Err(e) = task.await {
        warn!(error = %e, "Store write task failed");
    }
}
