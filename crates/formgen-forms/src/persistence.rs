//! Keyed record storage.
//!
//! A [`RecordStore`] holds serialized strings under string keys, the way a
//! browser's key-value storage does. [`save_record`], [`load_record`], and
//! [`clear_record`] store one submitted record as JSON under a key.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use formgen_core::{FormData, FormError, FormResult};

/// A string-valued key-value store.
pub trait RecordStore: Send + Sync {
    /// Returns the value stored under `key`.
    fn get(&self, key: &str) -> FormResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> FormResult<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> FormResult<()>;
}

/// An in-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, key: &str) -> FormResult<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> FormResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> FormResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

/// A store backed by one JSON object file.
///
/// A missing file reads as an empty store. Every write rewrites the file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Creates a store that reads and writes `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> FormResult<HashMap<String, String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(HashMap::new()),
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                FormError::Serialization(format!("{}: {e}", self.path.display()))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, entries: &HashMap<String, String>) -> FormResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

impl RecordStore for FileStore {
    fn get(&self, key: &str) -> FormResult<Option<String>> {
        let _lock = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> FormResult<()> {
        let _lock = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> FormResult<()> {
        let _lock = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

/// Serializes `record` as JSON and stores it under `key`.
pub fn save_record(store: &dyn RecordStore, key: &str, record: &FormData) -> FormResult<()> {
    let json = serde_json::to_string(record)?;
    store.set(key, &json)?;
    tracing::debug!(key, "record saved");
    Ok(())
}

/// Loads the record stored under `key`.
///
/// A value that does not parse as a record is treated as absent.
pub fn load_record(store: &dyn RecordStore, key: &str) -> FormResult<Option<FormData>> {
    let Some(json) = store.get(key)? else {
        return Ok(None);
    };
    match serde_json::from_str::<FormData>(&json) {
        Ok(record) => Ok(Some(record)),
        Err(e) => {
            tracing::warn!(key, error = %e, "ignoring malformed stored record");
            Ok(None)
        }
    }
}

/// Removes the record stored under `key`.
pub fn clear_record(store: &dyn RecordStore, key: &str) -> FormResult<()> {
    store.remove(key)?;
    tracing::debug!(key, "record cleared");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use formgen_core::Value;

    fn record() -> FormData {
        let mut data = FormData::new();
        data.insert("fullname".into(), Value::from("Ada Lovelace"));
        data.insert("rememberMe".into(), Value::Bool(true));
        data
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(load_record(&store, "userData").unwrap(), None);
        save_record(&store, "userData", &record()).unwrap();
        assert_eq!(load_record(&store, "userData").unwrap(), Some(record()));
        clear_record(&store, "userData").unwrap();
        assert_eq!(load_record(&store, "userData").unwrap(), None);
    }

    #[test]
    fn test_malformed_record_is_absent() {
        let store = MemoryStore::new();
        store.set("userData", "{not json").unwrap();
        assert_eq!(load_record(&store, "userData").unwrap(), None);
        store.set("userData", "[1, 2]").unwrap();
        assert_eq!(load_record(&store, "userData").unwrap(), None);
    }

    #[test]
    fn test_file_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");
        {
            let store = FileStore::new(&path);
            assert_eq!(store.get("userData").unwrap(), None);
            save_record(&store, "userData", &record()).unwrap();
            store.set("other", "1").unwrap();
        }
        let store = FileStore::new(&path);
        assert_eq!(load_record(&store, "userData").unwrap(), Some(record()));
        clear_record(&store, "userData").unwrap();
        assert_eq!(store.get("userData").unwrap(), None);
        assert_eq!(store.get("other").unwrap().as_deref(), Some("1"));
        assert_eq!(store.path(), path.as_path());
    }

    #[test]
    fn test_file_store_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "garbage").unwrap();
        let store = FileStore::new(&path);
        assert!(matches!(store.get("userData"), Err(FormError::Serialization(_))));
    }

    #[test]
    fn test_remove_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("store.json"));
        store.remove("nothing").unwrap();
        assert!(!store.path().exists());
    }
}
