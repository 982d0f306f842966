//! Bedtime estimation
//!
//! Wraps the injected sleep model with the wake-time arithmetic: wake time is
//! decomposed into calendar-local hour and minute, converted to seconds since
//! midnight, fed to the model, and the predicted sleep need is subtracted
//! from the wake timestamp.

use crate::error::EstimationError;
use crate::model::SleepModel;
use crate::types::BedtimeRecommendation;
use chrono::{Duration, Local, NaiveDateTime, Timelike};

/// Minimum desired sleep duration accepted by the form (hours)
pub const SLEEP_HOURS_MIN: f64 = 4.0;

/// Maximum desired sleep duration accepted by the form (hours)
pub const SLEEP_HOURS_MAX: f64 = 12.0;

/// Form step for desired sleep duration (hours)
pub const SLEEP_HOURS_STEP: f64 = 0.25;

/// Minimum daily coffee count accepted by the form
pub const COFFEE_CUPS_MIN: u32 = 1;

/// Maximum daily coffee count accepted by the form
pub const COFFEE_CUPS_MAX: u32 = 20;

/// Default wake time presented to the user: today at 07:00 local.
pub fn default_wake_time() -> NaiveDateTime {
    let now = Local::now();
    // 07:00 exists on every calendar day
    now.date_naive()
        .and_hms_opt(7, 0, 0)
        .unwrap_or_else(|| now.naive_local())
}

/// Bedtime estimator over an injected sleep model.
///
/// Inputs are presentation-layer preconditions, not validated here: the
/// desired duration is expected in `[4, 12]` hours in quarter-hour steps and
/// the coffee count at least 1. Out-of-range values are passed to the model
/// as-is.
pub struct BedtimeEstimator<M> {
    model: M,
}

impl<M: SleepModel> BedtimeEstimator<M> {
    /// Create an estimator around a sleep model
    pub fn new(model: M) -> Self {
        Self { model }
    }

    /// Estimate the recommended bedtime for a wake time.
    ///
    /// Only the hour and minute of `wake_time` feed the model (seconds are
    /// ignored, matching the wall-clock form input); the subtraction uses the
    /// full timestamp, so the recommendation may land on the previous
    /// calendar day.
    pub fn estimate(
        &self,
        wake_time: NaiveDateTime,
        sleep_duration_hours: f64,
        coffee_cups: u32,
    ) -> Result<BedtimeRecommendation, EstimationError> {
        let wake_seconds = (wake_time.hour() * 3600 + wake_time.minute() * 60) as f64;

        let predicted_sleep_seconds = self
            .model
            .predict(wake_seconds, sleep_duration_hours, coffee_cups as f64)?;

        let bedtime = wake_time - Duration::milliseconds((predicted_sleep_seconds * 1000.0) as i64);

        Ok(BedtimeRecommendation {
            bedtime,
            predicted_sleep_seconds,
        })
    }

    /// Consume the estimator and return the model
    pub fn into_model(self) -> M {
        self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use chrono::{NaiveDate, Timelike};

    fn wake_at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 16)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn test_estimate_crosses_midnight() {
        // 07:00 wake, stub predicting 8.5 hours of actual sleep
        let estimator = BedtimeEstimator::new(|_w: f64, _s: f64, _c: f64| -> Result<f64, ModelError> {
            Ok(8.5 * 3600.0)
        });
        let rec = estimator.estimate(wake_at(7, 0), 8.0, 2).unwrap();

        assert_eq!(rec.short_time(), "22:30");
        // Previous local day
        assert_eq!(rec.bedtime.date(), NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(rec.predicted_sleep_seconds, 30600.0);
    }

    #[test]
    fn test_estimate_is_date_independent() {
        let estimator = BedtimeEstimator::new(|_w: f64, _s: f64, _c: f64| -> Result<f64, ModelError> {
            Ok(8.5 * 3600.0)
        });

        let a = NaiveDate::from_ymd_opt(2023, 6, 1)
            .unwrap()
            .and_hms_opt(7, 0, 0)
            .unwrap();
        let b = NaiveDate::from_ymd_opt(2025, 12, 31)
            .unwrap()
            .and_hms_opt(7, 0, 0)
            .unwrap();

        let rec_a = estimator.estimate(a, 8.0, 2).unwrap();
        let rec_b = estimator.estimate(b, 8.0, 2).unwrap();
        assert_eq!(rec_a.short_time(), rec_b.short_time());
    }

    #[test]
    fn test_model_receives_seconds_since_midnight() {
        let estimator = BedtimeEstimator::new(
            |wake: f64, hours: f64, cups: f64| -> Result<f64, ModelError> {
                assert_eq!(wake, 6.0 * 3600.0 + 45.0 * 60.0);
                assert_eq!(hours, 7.25);
                assert_eq!(cups, 3.0);
                Ok(7.0 * 3600.0)
            },
        );
        estimator.estimate(wake_at(6, 45), 7.25, 3).unwrap();
    }

    #[test]
    fn test_wake_time_seconds_are_ignored() {
        let estimator = BedtimeEstimator::new(
            |wake: f64, _s: f64, _c: f64| -> Result<f64, ModelError> {
                assert_eq!(wake, 7.0 * 3600.0);
                Ok(8.0 * 3600.0)
            },
        );
        let wake = wake_at(7, 0).with_second(59).unwrap();
        estimator.estimate(wake, 8.0, 1).unwrap();
    }

    #[test]
    fn test_model_failure_surfaces_fixed_message() {
        let estimator = BedtimeEstimator::new(
            |_w: f64, _s: f64, _c: f64| -> Result<f64, ModelError> {
                Err(ModelError::Unavailable("missing weights".to_string()))
            },
        );
        let err = estimator.estimate(wake_at(7, 0), 8.0, 2).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Sorry, there was a problem calculating your bedtime."
        );
    }

    #[test]
    fn test_default_wake_time_is_seven_local() {
        let wake = default_wake_time();
        assert_eq!(wake.hour(), 7);
        assert_eq!(wake.minute(), 0);
    }

    #[test]
    fn test_estimate_with_shipped_model() {
        let estimator = BedtimeEstimator::new(crate::model::LinearSleepModel::default());
        let rec = estimator.estimate(wake_at(7, 0), 8.0, 2).unwrap();

        // Bedtime must precede the wake time by roughly the desired duration
        let slept = wake_at(7, 0) - rec.bedtime;
        assert!(slept.num_hours() >= 6);
        assert!(slept.num_hours() <= 10);
    }
}
