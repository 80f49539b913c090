//! Client-side Key/Value Storage
//!
//! The dashboard keeps its client state (token, cached profile, plan name,
//! per-day flags) in a flat string-keyed store. Two backends:
//!
//! - **FileStore**: one JSON object on disk, re-read on every access so a
//!   second process sees the last write
//! - **MemoryStore**: in-process map for tests and embedders

use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Flat string key/value store
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// JSON-file backed store
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Open store at the default path (<data_local_dir>/taskdesk/storage.json)
    pub fn open_default() -> Self {
        Self::new(Self::default_path())
    }

    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("taskdesk")
            .join("storage.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, StorageError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let data = std::fs::read_to_string(&self.path)?;
        if data.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        match serde_json::from_str(&data) {
            Ok(map) => Ok(map),
            Err(e) => {
                warn!("Ignoring corrupt storage file {}: {}", self.path.display(), e);
                Ok(BTreeMap::new())
            }
        }
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let data = serde_json::to_string_pretty(map)?;

        // Unique temp file per write, then atomic rename
        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(data.as_bytes())?;
        temp.persist(&self.path).map_err(|e| e.error)?;

        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_map()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock();
        let mut map = self.read_map()?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map)?;
        debug!("storage: set {}", key);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock();
        let mut map = self.read_map()?;
        if map.remove(key).is_some() {
            self.write_map(&map)?;
            debug!("storage: removed {}", key);
        }
        Ok(())
    }
}

/// In-memory store
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.write().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_store_basic_operations() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("storage.json"));

        assert_eq!(store.get("token").unwrap(), None);

        store.set("token", "abc").unwrap();
        assert_eq!(store.get("token").unwrap().as_deref(), Some("abc"));

        store.remove("token").unwrap();
        assert_eq!(store.get("token").unwrap(), None);
    }

    #[test]
    fn test_file_store_persistence() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");

        {
            let store = FileStore::new(&path);
            store.set("companyPlanName", "Enterprise").unwrap();
        }

        let reopened = FileStore::new(&path);
        assert_eq!(
            reopened.get("companyPlanName").unwrap().as_deref(),
            Some("Enterprise")
        );
    }

    #[test]
    fn test_file_store_sees_other_writer() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let first = FileStore::new(&path);
        let second = FileStore::new(&path);

        first.set("token", "one").unwrap();
        assert_eq!(second.get("token").unwrap().as_deref(), Some("one"));

        second.set("token", "two").unwrap();
        assert_eq!(first.get("token").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn test_concurrent_writers_share_one_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let handles: Vec<_> = (0..4)
            .map(|n| {
                let store = FileStore::new(&path);
                std::thread::spawn(move || {
                    for i in 0..25 {
                        store.set(&format!("writer{}", n), &i.to_string())?;
                    }
                    Ok::<_, StorageError>(())
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap().unwrap();
        }

        // File is intact and no temp files are left behind
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(serde_json::from_str::<BTreeMap<String, String>>(&raw).is_ok());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_file_store_corrupt_file_reads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = FileStore::new(&path);
        assert_eq!(store.get("token").unwrap(), None);

        // Next write replaces the corrupt content
        store.set("token", "fresh").unwrap();
        assert_eq!(store.get("token").unwrap().as_deref(), Some("fresh"));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        assert_eq!(store.len(), 2);

        store.remove("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
        assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
    }
}
