//! Fitted age scaler
//!
//! The scaler is fitted offline against the training ages and exported as a
//! small JSON artifact; it is loaded once at startup and read-only after.

use serde::Deserialize;
use std::path::Path;
use tbcare_common::{Error, Result};
use tracing::info;

/// Standard-score transform for the age feature
#[derive(Debug, Clone, Deserialize)]
pub struct AgeScaler {
    mean: f64,
    scale: f64,
}

impl AgeScaler {
    /// Load the scaler export; failure here must abort startup
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Artifact(format!("Failed to read age scaler {}: {e}", path.display()))
        })?;
        let scaler: AgeScaler = serde_json::from_str(&content).map_err(|e| {
            Error::Artifact(format!("Failed to parse age scaler {}: {e}", path.display()))
        })?;
        if !scaler.mean.is_finite() || !scaler.scale.is_finite() || scaler.scale == 0.0 {
            return Err(Error::Artifact(format!(
                "Degenerate age scaler {} (mean {}, scale {})",
                path.display(),
                scaler.mean,
                scaler.scale
            )));
        }
        info!(path = %path.display(), "Age scaler loaded");
        Ok(scaler)
    }

    /// Transform a raw age into the model's scaled age feature
    pub fn transform(&self, age: f64) -> f32 {
        ((age - self.mean) / self.scale) as f32
    }

    #[cfg(test)]
    pub(crate) fn from_parts(mean: f64, scale: f64) -> Self {
        Self { mean, scale }
    }
}
