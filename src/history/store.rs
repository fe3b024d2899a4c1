//! Key-value storage backing the calculation history.
//!
//! The recorder only needs `get`/`set`/`remove` on string values, so any
//! backend offering those can hold the history. Two are provided: an
//! in-memory map and a directory of JSON files.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::PersistenceError;

/// Asynchronous string key-value storage.
#[allow(async_fn_in_trait)]
pub trait KeyValueStore {
    /// Read the value under `key`, or `None` if nothing is stored.
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Replace the value under `key`.
    async fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError>;

    /// Delete the value under `key`. Succeeds if nothing was stored.
    async fn remove(&self, key: &str) -> Result<(), PersistenceError>;
}

impl<T: KeyValueStore> KeyValueStore for Arc<T> {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        (**self).remove(key).await
    }
}

/// Volatile storage, lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set`/`remove` fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), PersistenceError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(PersistenceError::Unavailable(
                "memory store is read-only".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.check_writable()?;
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        self.check_writable()?;
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

/// Storage as one `<key>.json` file per key inside a directory.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash mid-write never leaves a truncated history behind.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
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

fn io_error(path: &Path, source: std::io::Error) -> PersistenceError {
    PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let path = self.path_for(key);

        match fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| io_error(&self.dir, e))?;
        fs::write(&tmp, value).await.map_err(|e| io_error(&tmp, e))?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|e| io_error(&path, e))?;

        debug!(path = %path.display(), bytes = value.len(), "Wrote store entry");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        let path = self.path_for(key);

        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").await.unwrap(), None);

        store.set("k", "v1").await.unwrap();
        store.set("k", "v2").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v2"));

        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
        store.remove("k").await.unwrap();
    }

    #[tokio::test]
    async fn test_memory_store_failing_writes() {
        let store = MemoryStore::new();
        store.set("k", "kept").await.unwrap();

        store.set_fail_writes(true);
        assert!(store.set("k", "lost").await.is_err());
        assert!(store.remove("k").await.is_err());
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("kept"));

        store.set_fail_writes(false);
        store.set("k", "new").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_shared_store_through_arc() {
        let store = Arc::new(MemoryStore::new());
        let other = Arc::clone(&store);

        store.set("k", "v").await.unwrap();
        assert_eq!(other.get("k").await.unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("zcalc"));

        assert_eq!(store.get("calculatorHistory").await.unwrap(), None);

        store.set("calculatorHistory", r#"["1+1 = 2"]"#).await.unwrap();
        assert!(store.dir().join("calculatorHistory.json").exists());
        assert!(!store.dir().join("calculatorHistory.json.tmp").exists());
        assert_eq!(
            store.get("calculatorHistory").await.unwrap().as_deref(),
            Some(r#"["1+1 = 2"]"#)
        );

        store.remove("calculatorHistory").await.unwrap();
        assert_eq!(store.get("calculatorHistory").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_remove_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.remove("nothing-here").await.unwrap();
    }

    #[tokio::test]
    async fn test_file_store_read_error_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be cannot be read as a string
        std::fs::create_dir(dir.path().join("broken.json")).unwrap();
        let store = FileStore::new(dir.path());

        let err = store.get("broken").await.unwrap_err();
        assert!(matches!(err, PersistenceError::Io { .. }));
    }
}
