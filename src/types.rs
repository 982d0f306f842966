//! Core types for the Restwell engine
//!
//! This module defines the data that flows between the two components: the
//! sleep log entries persisted by the store and the recommendation value
//! produced by the estimator.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Lowest accepted sleep quality rating
pub const QUALITY_MIN: u8 = 1;

/// Highest accepted sleep quality rating
pub const QUALITY_MAX: u8 = 5;

/// One daily sleep quality record.
///
/// Entries are immutable once created: `id` and `date` are stamped at
/// construction and the store never exposes update or delete operations.
/// Field names are fixed for interop with previously persisted logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepLogEntry {
    /// Unique identifier, generated at creation
    pub id: Uuid,
    /// Time the entry was saved (UTC, RFC 3339 on the wire)
    pub date: DateTime<Utc>,
    /// Subjective rating, 1-5 inclusive (caller precondition, not clamped)
    pub quality: u8,
    /// Free-text comments, may be empty
    pub comments: String,
}

impl SleepLogEntry {
    /// Create a new entry with a fresh id and the current timestamp.
    pub fn new(quality: u8, comments: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            date: Utc::now(),
            quality,
            comments: comments.into(),
        }
    }
}

/// The persisted ordered list of sleep log entries.
///
/// Insertion order is chronological save order. Unbounded despite the name:
/// no date windowing or pruning occurs.
pub type WeeklySummary = Vec<SleepLogEntry>;

/// Result of a bedtime estimation.
///
/// Carries the full computed timestamp alongside the raw model output so a
/// presentation layer can choose its own rendering; `Display` gives the
/// short `HH:MM` form (no date, no seconds).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BedtimeRecommendation {
    /// Recommended bedtime (calendar-local, may fall on the previous day)
    pub bedtime: NaiveDateTime,
    /// Predicted actual sleep need reported by the model, in seconds
    pub predicted_sleep_seconds: f64,
}

impl BedtimeRecommendation {
    /// Short time rendering: hours and minutes only.
    pub fn short_time(&self) -> String {
        self.bedtime.format("%H:%M").to_string()
    }
}

impl fmt::Display for BedtimeRecommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_time())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_entry_json_shape() {
        let entry = SleepLogEntry::new(4, "slept well");
        let json: serde_json::Value = serde_json::to_value(&entry).unwrap();

        assert!(json["id"].is_string());
        assert!(json["date"].is_string());
        assert_eq!(json["quality"], 4);
        assert_eq!(json["comments"], "slept well");
    }

    #[test]
    fn test_entry_round_trip() {
        let entry = SleepLogEntry::new(QUALITY_MAX, "");
        let json = serde_json::to_string(&entry).unwrap();
        let decoded: SleepLogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, entry);
    }

    #[test]
    fn test_entries_have_unique_ids() {
        let a = SleepLogEntry::new(3, "");
        let b = SleepLogEntry::new(3, "");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_recommendation_short_time_omits_date() {
        let rec = BedtimeRecommendation {
            bedtime: NaiveDate::from_ymd_opt(2024, 1, 15)
                .unwrap()
                .and_hms_opt(22, 30, 0)
                .unwrap(),
            predicted_sleep_seconds: 30600.0,
        };
        assert_eq!(rec.short_time(), "22:30");
        assert_eq!(rec.to_string(), "22:30");
    }
}
