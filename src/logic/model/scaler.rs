//! Fitted Standard Scaler
//!
//! Holds the per-column mean/scale the training pipeline exported and applies
//! `(x - mean) / scale`. The column order in the artifact must match
//! SCALER_LAYOUT exactly; the model was fitted on that order.

use serde::{Deserialize, Serialize};

use crate::logic::features::layout::{FEATURE_COUNT, SCALER_LAYOUT};

/// Fitted scaler parameters, as exported by the training pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerParams {
    /// Column names in the order the scaler was fitted on
    pub columns: Vec<String>,
    /// Per-column mean
    pub mean: Vec<f64>,
    /// Per-column scale (standard deviation)
    pub scale: Vec<f64>,
}

#[derive(Debug)]
pub struct ScalerError(pub String);

impl std::fmt::Display for ScalerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ScalerError: {}", self.0)
    }
}

impl std::error::Error for ScalerError {}

impl ScalerParams {
    /// Validate column count and order against the fitted layout.
    ///
    /// A mismatch here means the artifact and this build disagree on the
    /// feature schema; scaling with it would silently mis-assign columns.
    pub fn validate(&self) -> Result<(), ScalerError> {
        if self.columns.len() != FEATURE_COUNT
            || self.mean.len() != FEATURE_COUNT
            || self.scale.len() != FEATURE_COUNT
        {
            return Err(ScalerError(format!(
                "Expected {} columns, artifact has {} names / {} means / {} scales",
                FEATURE_COUNT,
                self.columns.len(),
                self.mean.len(),
                self.scale.len()
            )));
        }

        for (i, expected) in SCALER_LAYOUT.iter().enumerate() {
            if self.columns[i] != *expected {
                return Err(ScalerError(format!(
                    "Column {} is '{}', scaler was fitted on '{}'",
                    i, self.columns[i], expected
                )));
            }
        }

        Ok(())
    }

    /// Apply the fitted transform to one scaler-ordered row.
    ///
    /// Zero-variance columns are guarded the same way the training side
    /// guards them, so an all-zero record never divides by zero.
    pub fn transform(&self, columns: &[f64; FEATURE_COUNT]) -> Result<[f64; FEATURE_COUNT], ScalerError> {
        self.validate()?;

        let mut scaled = [0.0; FEATURE_COUNT];
        for i in 0..FEATURE_COUNT {
            let scale = if self.scale[i].abs() < 1e-8 { 1.0 } else { self.scale[i] };
            scaled[i] = (columns[i] - self.mean[i]) / scale;
        }

        Ok(scaled)
    }
}
