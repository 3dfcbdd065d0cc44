//! Key-value persistence backends for the session store.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Durable string key-value storage.
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Process-local storage. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(lock(&self.entries).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        lock(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        lock(&self.entries).remove(key);
        Ok(())
    }
}

/// Storage backed by a single JSON document on disk.
///
/// Every write replaces the file through a sibling temp file and a rename, so
/// readers see either the old or the new document.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    guard: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(StorageError::Io(e)),
        };
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| StorageError::Corrupt(e.to_string()))
    }

    fn write(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| StorageError::Serialize(e.to_string()))?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, content).map_err(StorageError::Io)?;
        std::fs::rename(&tmp, &self.path).map_err(StorageError::Io)
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = lock(&self.guard);
        Ok(self.read()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = lock(&self.guard);
        let mut entries = self.read()?;
        entries.insert(key.to_string(), value.to_string());
        self.write(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = lock(&self.guard);
        let mut entries = self.read()?;
        if entries.remove(key).is_some() {
            self.write(&entries)?;
        }
        Ok(())
    }
}

/// Errors that can occur while persisting session data.
#[derive(Debug)]
pub enum StorageError {
    /// Underlying file operation failed
    Io(std::io::Error),
    /// Value could not be serialized
    Serialize(String),
    /// Stored data could not be parsed
    Corrupt(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "Storage I/O error: {}", e),
            StorageError::Serialize(e) => write!(f, "Failed to serialize value: {}", e),
            StorageError::Corrupt(e) => write!(f, "Stored data is corrupt: {}", e),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("examdesk-storage-{}.json", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_memory_storage_basic() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("token").unwrap(), None);

        storage.set("token", "abc").unwrap();
        assert_eq!(storage.get("token").unwrap().as_deref(), Some("abc"));

        storage.remove("token").unwrap();
        storage.remove("token").unwrap();
        assert_eq!(storage.get("token").unwrap(), None);
    }

    #[test]
    fn test_file_storage_survives_reopen() {
        let path = temp_path();

        let storage = FileStorage::new(&path);
        storage.set("token", "abc").unwrap();
        storage.set("user", "{}").unwrap();
        drop(storage);

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get("token").unwrap().as_deref(), Some("abc"));
        assert_eq!(reopened.get("user").unwrap().as_deref(), Some("{}"));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_file_storage_missing_file_is_empty() {
        let storage = FileStorage::new(temp_path());
        assert_eq!(storage.get("token").unwrap(), None);
        storage.remove("token").unwrap();
        assert!(!storage.path().exists());
    }

    #[test]
    fn test_file_storage_corrupt_file() {
        let path = temp_path();
        std::fs::write(&path, "{ not json").unwrap();

        let storage = FileStorage::new(&path);
        assert!(matches!(storage.get("token"), Err(StorageError::Corrupt(_))));

        std::fs::remove_file(&path).ok();
    }
}
