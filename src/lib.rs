//! Restwell - On-device bedtime recommendation and sleep quality log engine
//!
//! Restwell turns a desired wake time, sleep duration target, and daily
//! caffeine intake into a recommended bedtime via an injected pre-trained
//! regression model, and keeps a persisted append-only log of daily
//! subjective sleep quality ratings.
//!
//! ## Modules
//!
//! - **Estimator**: Bedtime arithmetic around a pluggable [`SleepModel`]
//! - **Sleep Log**: Whole-list JSON persistence over a swappable key-value backend

pub mod backends;
pub mod error;
pub mod estimator;
pub mod model;
pub mod store;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use backends::{FileBackend, KeyValueStore, MemoryBackend};
pub use error::{EstimationError, ModelError, SaveError};
pub use estimator::{default_wake_time, BedtimeEstimator};
pub use model::{LinearSleepModel, SleepModel};
pub use store::{SleepLogStore, WEEKLY_SUMMARY_KEY};
pub use types::{BedtimeRecommendation, SleepLogEntry, WeeklySummary};

/// Restwell version embedded in CLI and FFI surfaces
pub const RESTWELL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for diagnostics output
pub const PRODUCER_NAME: &str = "restwell";
