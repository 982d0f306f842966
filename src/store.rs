//! Sleep log persistence
//!
//! The weekly summary lives under a single key as one JSON-encoded array;
//! every append is a whole-list read-modify-write. The policy is asymmetric
//! by design: loads are fail-open (absent or corrupt data reads as an empty
//! history and never blocks the caller), saves surface a [`SaveError`].

use crate::backends::KeyValueStore;
use crate::error::{SaveCause, SaveError};
use crate::types::{SleepLogEntry, WeeklySummary};
use std::time::Duration;

/// Storage key holding the encoded weekly summary
pub const WEEKLY_SUMMARY_KEY: &str = "WeeklySummary";

/// Append-only sleep quality log over a key-value backend.
///
/// Entries are never mutated or removed; the list only grows. `append` takes
/// `&mut self`, so writes are serialized by construction.
pub struct SleepLogStore<B> {
    backend: B,
    key: String,
    save_delay: Option<Duration>,
}

impl<B: KeyValueStore> SleepLogStore<B> {
    /// Create a store over `backend` using the default key
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            key: WEEKLY_SUMMARY_KEY.to_string(),
            save_delay: None,
        }
    }

    /// Use a non-default storage key
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Delay each save by `delay` before touching the backend.
    ///
    /// Presentation-layer timing hook (lets a transient "saving" indicator
    /// render in demos); has no correctness purpose and is off by default.
    pub fn with_save_delay(mut self, delay: Duration) -> Self {
        self.save_delay = Some(delay);
        self
    }

    /// Load the full history in chronological save order.
    ///
    /// An absent blob and an undecodable blob both read as an empty history;
    /// decode failures are never surfaced.
    pub fn load_all(&self) -> WeeklySummary {
        match self.backend.get(&self.key) {
            Some(blob) => serde_json::from_slice(&blob).unwrap_or_default(),
            None => WeeklySummary::new(),
        }
    }

    /// Append one entry with a fresh id and the current timestamp.
    ///
    /// Re-encodes and rewrites the whole list. Returns the stored entry on
    /// success so the caller can clear transient input state.
    pub fn append(&mut self, quality: u8, comments: &str) -> Result<SleepLogEntry, SaveError> {
        let entry = SleepLogEntry::new(quality, comments);

        let mut summary = self.load_all();
        summary.push(entry.clone());

        let blob = serde_json::to_vec(&summary).map_err(SaveCause::Encode)?;

        if let Some(delay) = self.save_delay {
            std::thread::sleep(delay);
        }

        self.backend
            .set(&self.key, blob)
            .map_err(SaveCause::Backend)?;

        Ok(entry)
    }

    /// Borrow the underlying backend
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::MemoryBackend;
    use crate::error::BackendError;
    use pretty_assertions::assert_eq;

    /// Backend whose writes always fail, for exercising the save error path
    struct RejectingBackend;

    impl KeyValueStore for RejectingBackend {
        fn get(&self, _key: &str) -> Option<Vec<u8>> {
            None
        }

        fn set(&mut self, key: &str, _value: Vec<u8>) -> Result<(), BackendError> {
            Err(BackendError::Io {
                key: key.to_string(),
                message: "write rejected".to_string(),
            })
        }
    }

    #[test]
    fn test_load_all_on_empty_store() {
        let store = SleepLogStore::new(MemoryBackend::new());
        assert_eq!(store.load_all(), Vec::new());
    }

    #[test]
    fn test_append_then_load_all() {
        let mut store = SleepLogStore::new(MemoryBackend::new());
        let saved = store.append(4, "woke up refreshed").unwrap();

        let summary = store.load_all();
        assert_eq!(summary.len(), 1);
        assert_eq!(summary.last().unwrap(), &saved);
        assert_eq!(summary[0].quality, 4);
        assert_eq!(summary[0].comments, "woke up refreshed");
    }

    #[test]
    fn test_repeated_appends_preserve_order() {
        let mut store = SleepLogStore::new(MemoryBackend::new());
        let first = store.append(2, "restless").unwrap();
        let second = store.append(5, "").unwrap();
        let third = store.append(2, "restless").unwrap();

        let summary = store.load_all();
        assert_eq!(summary.len(), 3);
        assert_eq!(summary[0].id, first.id);
        assert_eq!(summary[1].id, second.id);
        assert_eq!(summary[2].id, third.id);
        // Identical ratings and comments are kept as distinct entries
        assert_ne!(summary[0].id, summary[2].id);
    }

    #[test]
    fn test_quality_bounds_round_trip() {
        let mut store = SleepLogStore::new(MemoryBackend::new());
        store.append(crate::types::QUALITY_MIN, "").unwrap();
        store.append(crate::types::QUALITY_MAX, "").unwrap();

        let summary = store.load_all();
        assert_eq!(summary[0].quality, 1);
        assert_eq!(summary[1].quality, 5);
    }

    #[test]
    fn test_corrupt_blob_reads_as_empty() {
        let mut backend = MemoryBackend::new();
        backend
            .set(WEEKLY_SUMMARY_KEY, b"{not json at all".to_vec())
            .unwrap();

        let store = SleepLogStore::new(backend);
        assert_eq!(store.load_all(), Vec::new());
    }

    #[test]
    fn test_append_recovers_after_corrupt_blob() {
        let mut backend = MemoryBackend::new();
        backend
            .set(WEEKLY_SUMMARY_KEY, b"\xff\xfe".to_vec())
            .unwrap();

        let mut store = SleepLogStore::new(backend);
        store.append(3, "fresh start").unwrap();

        let summary = store.load_all();
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].comments, "fresh start");
    }

    #[test]
    fn test_backend_write_failure_is_save_error() {
        let mut store = SleepLogStore::new(RejectingBackend);
        let err = store.append(3, "").unwrap_err();
        assert_eq!(err.to_string(), "Failed to save. Please try again.");
    }

    #[test]
    fn test_custom_key() {
        let mut store = SleepLogStore::new(MemoryBackend::new()).with_key("OtherSummary");
        store.append(3, "").unwrap();

        assert!(store.backend().get("OtherSummary").is_some());
        assert!(store.backend().get(WEEKLY_SUMMARY_KEY).is_none());
    }

    #[test]
    fn test_persisted_json_is_an_array_of_entries() {
        let mut store = SleepLogStore::new(MemoryBackend::new());
        store.append(4, "ok").unwrap();

        let blob = store.backend().get(WEEKLY_SUMMARY_KEY).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&blob).unwrap();

        let arr = json.as_array().unwrap();
        assert_eq!(arr.len(), 1);
        assert!(arr[0]["id"].is_string());
        assert!(arr[0]["date"].is_string());
        assert_eq!(arr[0]["quality"], 4);
        assert_eq!(arr[0]["comments"], "ok");
    }

    #[test]
    fn test_date_is_stamped_at_append() {
        let before = chrono::Utc::now();
        let mut store = SleepLogStore::new(MemoryBackend::new());
        let entry = store.append(3, "").unwrap();
        let after = chrono::Utc::now();

        assert!(entry.date >= before);
        assert!(entry.date <= after);
    }
}
