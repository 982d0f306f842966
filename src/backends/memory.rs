//! In-memory backend
//!
//! Used by tests and demos; nothing survives the process.

use super::KeyValueStore;
use crate::error::BackendError;
use std::collections::HashMap;

/// Volatile key-value store backed by a `HashMap`
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    blobs: HashMap<String, Vec<u8>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

impl KeyValueStore for MemoryBackend {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.blobs.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Vec<u8>) -> Result<(), BackendError> {
        self.blobs.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get() {
        let mut backend = MemoryBackend::new();
        backend.set("k", b"v1".to_vec()).unwrap();
        assert_eq!(backend.get("k"), Some(b"v1".to_vec()));

        backend.set("k", b"v2".to_vec()).unwrap();
        assert_eq!(backend.get("k"), Some(b"v2".to_vec()));
        assert_eq!(backend.len(), 1);
    }

    #[test]
    fn test_get_absent_key() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.get("missing"), None);
    }
}
