//! Sleep model collaborator
//!
//! The estimator treats the regression model as an opaque numeric function:
//! three inputs, one output. [`SleepModel`] is the seam that lets hosts plug
//! in a platform model and lets tests supply deterministic stubs.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};

/// A pre-trained regression model predicting actual sleep need.
///
/// Inputs are the wake time as seconds since local midnight, the desired
/// sleep duration in hours, and the daily coffee count. The single output is
/// the predicted actual sleep duration in seconds.
pub trait SleepModel {
    fn predict(
        &self,
        wake_seconds: f64,
        sleep_duration_hours: f64,
        coffee_cups: f64,
    ) -> Result<f64, ModelError>;
}

/// Closures act as models, so tests can inject fixed predictions.
impl<F> SleepModel for F
where
    F: Fn(f64, f64, f64) -> Result<f64, ModelError>,
{
    fn predict(
        &self,
        wake_seconds: f64,
        sleep_duration_hours: f64,
        coffee_cups: f64,
    ) -> Result<f64, ModelError> {
        self(wake_seconds, sleep_duration_hours, coffee_cups)
    }
}

/// Linear regression model shipped with the crate.
///
/// The default coefficients were fitted offline against a sleep study
/// export; they can be replaced at runtime by loading a JSON coefficient
/// file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearSleepModel {
    /// Intercept term (seconds)
    pub intercept: f64,
    /// Weight on wake time (seconds since midnight)
    pub wake_coef: f64,
    /// Weight on desired sleep duration (hours)
    pub sleep_coef: f64,
    /// Weight on daily coffee count (cups)
    pub coffee_coef: f64,
}

impl Default for LinearSleepModel {
    fn default() -> Self {
        // Shipped pre-trained coefficients
        Self {
            intercept: 1023.4,
            wake_coef: 0.0168,
            sleep_coef: 3566.2,
            coffee_coef: 402.6,
        }
    }
}

impl LinearSleepModel {
    /// Load coefficients from JSON
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let model: Self = serde_json::from_str(json)
            .map_err(|e| ModelError::InvalidConfiguration(e.to_string()))?;
        model.validate()?;
        Ok(model)
    }

    /// Serialize coefficients to JSON
    pub fn to_json(&self) -> Result<String, ModelError> {
        serde_json::to_string(self).map_err(|e| ModelError::InvalidConfiguration(e.to_string()))
    }

    fn validate(&self) -> Result<(), ModelError> {
        let coefs = [
            self.intercept,
            self.wake_coef,
            self.sleep_coef,
            self.coffee_coef,
        ];
        if coefs.iter().any(|c| !c.is_finite()) {
            return Err(ModelError::InvalidConfiguration(
                "non-finite coefficient".to_string(),
            ));
        }
        Ok(())
    }
}

impl SleepModel for LinearSleepModel {
    fn predict(
        &self,
        wake_seconds: f64,
        sleep_duration_hours: f64,
        coffee_cups: f64,
    ) -> Result<f64, ModelError> {
        let predicted = self.intercept
            + self.wake_coef * wake_seconds
            + self.sleep_coef * sleep_duration_hours
            + self.coffee_coef * coffee_cups;

        if !predicted.is_finite() || predicted < 0.0 {
            return Err(ModelError::Inference(format!(
                "predicted sleep out of range: {}",
                predicted
            )));
        }

        Ok(predicted)
    }
}
