// src/cache/store.rs
// =============================================================================
// Two `KeyValueStore` implementations:
//
// - MemoryStore: a HashMap behind a Mutex. Lives as long as the process.
// - FileStore:   a flat JSON object on disk, rewritten on every change.
//                Lets the CLI keep a daily cache between runs.
// =============================================================================

use super::KeyValueStore;
use crate::error::{Error, Result};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().map_err(|_| poisoned())?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| poisoned())?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.entries.lock().map_err(|_| poisoned())?.clear();
        Ok(())
    }
}

/// A store persisted as one JSON object (`{"key": "value", ...}`).
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Opens the store at `path`. A missing file is an empty store; it is
    /// created on the first write.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|e| Error::decode(format!("cache file {}", path.display()), e))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(Error::io(&path, e)),
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| Error::decode("cache entries", e))?;
        std::fs::write(&self.path, json).map_err(|e| Error::io(&self.path, e))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().map_err(|_| poisoned())?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| poisoned())?;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn clear(&self) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| poisoned())?;
        if entries.is_empty() && !self.path.exists() {
            return Ok(());
        }
        entries.clear();
        self.persist(&entries)
    }
}

fn poisoned() -> Error {
    Error::cache("store lock poisoned")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert_eq!(store.get("a").unwrap(), None);
        store.set("a", "1").unwrap();
        store.set("a", "2").unwrap();
        assert_eq!(store.get("a").unwrap(), Some("2".to_string()));
        store.clear().unwrap();
        assert_eq!(store.get("a").unwrap(), None);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cache.json");

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.path(), path.as_path());
        assert_eq!(store.get("readme").unwrap(), None);
        store.set("readme", "# Title\n\nBody").unwrap();
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("readme").unwrap(),
            Some("# Title\n\nBody".to_string())
        );

        reopened.clear().unwrap();
        let again = FileStore::open(&path).unwrap();
        assert_eq!(again.get("readme").unwrap(), None);
    }

    #[test]
    fn test_file_store_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(FileStore::open(&path), Err(Error::Decode { .. })));
    }

    #[test]
    fn test_clear_on_missing_file_does_not_create_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let store = FileStore::open(&path).unwrap();
        store.clear().unwrap();
        assert!(!path.exists());
    }
}
