//! Pre-fitted feature scaling, exported from training as JSON.

use serde::Deserialize;
use std::path::Path;

use crate::error::ArtifactError;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scaler {
    /// `(x - mean) / scale`; a zero scale passes the centered value through.
    Standard { mean: Vec<f32>, scale: Vec<f32> },
    /// `(x - min) / (max - min)`; a zero range maps to 0.
    MinMax { min: Vec<f32>, max: Vec<f32> },
}

impl Scaler {
    pub fn from_path(path: &Path) -> Result<Self, ArtifactError> {
        let scaler: Scaler = super::read_json(path)?;
        scaler.validate()?;
        tracing::debug!(
            "Loaded {} scaler from {} ({} features)",
            scaler.kind(),
            path.display(),
            scaler.width()
        );
        Ok(scaler)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Scaler::Standard { .. } => "standard",
            Scaler::MinMax { .. } => "min_max",
        }
    }

    pub fn width(&self) -> usize {
        match self {
            Scaler::Standard { mean, .. } => mean.len(),
            Scaler::MinMax { min, .. } => min.len(),
        }
    }

    fn validate(&self) -> Result<(), ArtifactError> {
        let (a, b) = match self {
            Scaler::Standard { mean, scale } => (mean.len(), scale.len()),
            Scaler::MinMax { min, max } => (min.len(), max.len()),
        };
        if a != b {
            return Err(ArtifactError::Invalid(format!(
                "{} scaler parameter lengths differ ({} vs {})",
                self.kind(),
                a,
                b
            )));
        }
        if a == 0 {
            return Err(ArtifactError::Invalid(format!(
                "{} scaler has no features",
                self.kind()
            )));
        }
        Ok(())
    }

    pub fn transform(&self, batch: &[Vec<f32>]) -> Result<Vec<Vec<f32>>, ArtifactError> {
        batch.iter().map(|row| self.transform_row(row)).collect()
    }

    fn transform_row(&self, row: &[f32]) -> Result<Vec<f32>, ArtifactError> {
        if row.len() != self.width() {
            return Err(ArtifactError::Shape {
                what: "scaler",
                expected: self.width(),
                actual: row.len(),
            });
        }

        let scaled = match self {
            Scaler::Standard { mean, scale } => row
                .iter()
                .zip(mean.iter().zip(scale))
                .map(|(x, (m, s))| {
                    let s = if *s == 0.0 { 1.0 } else { *s };
                    (x - m) / s
                })
                .collect(),
            Scaler::MinMax { min, max } => row
                .iter()
                .zip(min.iter().zip(max))
                .map(|(x, (lo, hi))| {
                    let range = hi - lo;
                    if range == 0.0 { 0.0 } else { (x - lo) / range }
                })
                .collect(),
        };
        Ok(scaled)
    }
}
