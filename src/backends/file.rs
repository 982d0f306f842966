//! File-backed key-value store
//!
//! Each key maps to one `<key>.json` file under a data directory. Writes
//! replace the whole file, matching the whole-list persistence shape of the
//! sleep log.

use super::KeyValueStore;
use crate::error::BackendError;
use std::fs;
use std::path::{Path, PathBuf};

/// Key-value store persisting each key as a file in a directory
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Create a backend rooted at `dir`. The directory is created lazily on
    /// first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory this backend writes into
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileBackend {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        // Missing and unreadable files both read as absent
        fs::read(self.path_for(key)).ok()
    }

    fn set(&mut self, key: &str, value: Vec<u8>) -> Result<(), BackendError> {
        fs::create_dir_all(&self.dir).map_err(|e| BackendError::Io {
            key: key.to_string(),
            message: format!("create_dir_all {}: {}", self.dir.display(), e),
        })?;
        let path = self.path_for(key);
        fs::write(&path, value).map_err(|e| BackendError::Io {
            key: key.to_string(),
            message: format!("write {}: {}", path.display(), e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("restwell_file_backend_{}", name));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_set_creates_directory_and_file() {
        let dir = temp_dir("create");
        let mut backend = FileBackend::new(&dir);

        backend.set("WeeklySummary", b"[]".to_vec()).unwrap();
        assert!(dir.join("WeeklySummary.json").exists());
        assert_eq!(backend.get("WeeklySummary"), Some(b"[]".to_vec()));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_get_absent_key_is_none() {
        let dir = temp_dir("absent");
        let backend = FileBackend::new(&dir);
        assert_eq!(backend.get("WeeklySummary"), None);
    }

    #[test]
    fn test_set_replaces_previous_blob() {
        let dir = temp_dir("replace");
        let mut backend = FileBackend::new(&dir);

        backend.set("k", b"old".to_vec()).unwrap();
        backend.set("k", b"new".to_vec()).unwrap();
        assert_eq!(backend.get("k"), Some(b"new".to_vec()));

        let _ = fs::remove_dir_all(&dir);
    }
}
