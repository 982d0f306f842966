//! Error types for Restwell
//!
//! Two errors cross the public boundary: [`EstimationError`] and [`SaveError`].
//! Both render as a single fixed user-facing message; the underlying cause is
//! kept on the `source()` chain for diagnostics and never shown to the user.

use thiserror::Error;

/// Errors reported by a sleep model collaborator.
///
/// The engine treats the model as opaque: it only distinguishes failure modes
/// for diagnostics, never for control flow.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Model unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid model configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Inference failed: {0}")]
    Inference(String),
}

/// A bedtime could not be estimated because the sleep model failed.
///
/// Displays as one fixed message regardless of the cause. No retry is
/// performed; a single failed attempt surfaces immediately.
#[derive(Debug, Error)]
#[error("Sorry, there was a problem calculating your bedtime.")]
pub struct EstimationError {
    #[source]
    pub cause: ModelError,
}

impl From<ModelError> for EstimationError {
    fn from(cause: ModelError) -> Self {
        Self { cause }
    }
}

/// Errors reported by a key-value storage backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("I/O error for key '{key}': {message}")]
    Io { key: String, message: String },
}

/// Underlying reason an append failed.
#[derive(Debug, Error)]
pub enum SaveCause {
    #[error("Failed to encode sleep log: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// A sleep log entry could not be persisted.
///
/// Displays as one fixed message. The caller may retry manually; the store
/// never retries on its own.
#[derive(Debug, Error)]
#[error("Failed to save. Please try again.")]
pub struct SaveError {
    #[source]
    pub cause: SaveCause,
}

impl From<SaveCause> for SaveError {
    fn from(cause: SaveCause) -> Self {
        Self { cause }
    }
}
