//! Persistence adapters: key-value blob stores for the serialized state

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Key-value blob store the engine reads once at startup and writes after
/// every mutation
pub trait StateBackend: Send {
    /// Human-readable name for this backend
    fn name(&self) -> &str;

    /// Read a blob, `None` if absent
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace a blob in full
    fn set(&mut self, key: &str, blob: &str) -> Result<()>;

    /// Drop a blob; absent keys are not an error
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-memory backend; clones share the same entries
#[derive(Clone, Default)]
pub struct MemoryBackend {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend pre-populated with one blob
    pub fn with_entry(key: &str, blob: &str) -> Self {
        let backend = Self::new();
        if let Ok(mut entries) = backend.entries.lock() {
            entries.insert(key.to_string(), blob.to_string());
        }
        backend
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| Error::Persistence("memory backend lock poisoned".to_string()))
    }
}

impl StateBackend for MemoryBackend {
    fn name(&self) -> &str {
        "memory"
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&mut self, key: &str, blob: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), blob.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// One JSON file per key under a directory
///
/// Writes go to a temp file in the same directory and are renamed into
/// place, so readers never observe a partial snapshot.
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Create a file backend, creating the directory if it doesn't exist
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| {
                Error::Persistence(format!(
                    "Failed to create data directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
            info!("Created data directory: {}", dir.display());
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path for a key
    ///
    /// Keys reaching here from config are plain file stems; see
    /// `EngineConfig::validate`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl StateBackend for FileBackend {
    fn name(&self) -> &str {
        "file"
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&mut self, key: &str, blob: &str) -> Result<()> {
        let path = self.path_for(key);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(blob.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| {
            Error::Persistence(format!("Failed to write {}: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), bytes = blob.len(), "Snapshot written");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_backend_clones_share_entries() {
        let mut backend = MemoryBackend::new();
        let observer = backend.clone();

        assert_eq!(backend.get("k").unwrap(), None);
        backend.set("k", "{}").unwrap();
        assert_eq!(observer.get("k").unwrap().as_deref(), Some("{}"));

        backend.remove("k").unwrap();
        assert_eq!(observer.get("k").unwrap(), None);
    }

    #[test]
    fn test_file_backend_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = FileBackend::new(dir.path().join("nested")).unwrap();

        assert_eq!(backend.get("novaState").unwrap(), None);
        backend.set("novaState", r#"{"a":1}"#).unwrap();
        backend.set("novaState", r#"{"a":2}"#).unwrap();
        assert_eq!(
            backend.get("novaState").unwrap().as_deref(),
            Some(r#"{"a":2}"#)
        );
        assert!(backend.path_for("novaState").exists());

        backend.remove("novaState").unwrap();
        backend.remove("novaState").unwrap();
        assert_eq!(backend.get("novaState").unwrap(), None);
    }

    #[test]
    fn test_file_backend_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = FileBackend::new(dir.path()).unwrap();
        backend.set("k", "blob").unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["k.json".to_string()]);
    }
}
