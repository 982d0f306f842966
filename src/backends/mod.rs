//! Key-value storage backends
//!
//! This module provides the narrow persistence capability the sleep log
//! needs: get a blob by key, set a blob by key. Backends are swappable so a
//! host can route the log to whatever store the platform offers.

mod file;
mod memory;

pub use file::FileBackend;
pub use memory::MemoryBackend;

use crate::error::BackendError;

/// Trait for key-value storage backends
pub trait KeyValueStore {
    /// Read the blob stored under `key`, or `None` if absent.
    ///
    /// Read failures are indistinguishable from absence; the sleep log is
    /// fail-open on load.
    fn get(&self, key: &str) -> Option<Vec<u8>>;

    /// Write `value` under `key`, replacing any previous blob.
    fn set(&mut self, key: &str, value: Vec<u8>) -> Result<(), BackendError>;
}
