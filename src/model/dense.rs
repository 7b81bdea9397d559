//! Feed-forward network stored as JSON, one entry per Dense layer.
//!
//! ```json
//! {
//!   "input_width": 21,
//!   "layers": [
//!     { "kernel": [[...], ...], "bias": [...], "activation": "relu" },
//!     { "kernel": [[...], ...], "bias": [...], "activation": "sigmoid" }
//!   ]
//! }
//! ```
//!
//! `kernel` is laid out `[inputs][units]`, matching a Keras Dense kernel.

use serde::Deserialize;
use std::path::Path;

use crate::error::ArtifactError;
use crate::model::Predictor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Linear,
    Relu,
    Sigmoid,
    Tanh,
}

impl Activation {
    fn apply(self, z: f32) -> f32 {
        match self {
            Activation::Linear => z,
            Activation::Relu => z.max(0.0),
            Activation::Sigmoid => 1.0 / (1.0 + (-z).exp()),
            Activation::Tanh => z.tanh(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DenseLayer {
    pub kernel: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
    #[serde(default = "default_activation")]
    pub activation: Activation,
}

fn default_activation() -> Activation {
    Activation::Linear
}

impl DenseLayer {
    fn inputs(&self) -> usize {
        self.kernel.len()
    }

    fn units(&self) -> usize {
        self.bias.len()
    }

    fn forward(&self, input: &[f32]) -> Vec<f32> {
        let mut out = self.bias.clone();
        for (x, row) in input.iter().zip(&self.kernel) {
            for (acc, w) in out.iter_mut().zip(row) {
                *acc += x * w;
            }
        }
        for v in out.iter_mut() {
            *v = self.activation.apply(*v);
        }
        out
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DenseModel {
    input_width: usize,
    layers: Vec<DenseLayer>,
}

impl DenseModel {
    pub fn new(input_width: usize, layers: Vec<DenseLayer>) -> Result<Self, ArtifactError> {
        let model = Self {
            input_width,
            layers,
        };
        model.validate()?;
        Ok(model)
    }

    pub fn from_path(path: &Path) -> Result<Self, ArtifactError> {
        let DenseModel {
            input_width,
            layers,
        } = super::read_json(path)?;
        let model = Self::new(input_width, layers)?;
        tracing::debug!(
            "Loaded dense model from {} ({} layers, {} inputs)",
            path.display(),
            model.layers.len(),
            model.input_width
        );
        Ok(model)
    }

    fn validate(&self) -> Result<(), ArtifactError> {
        if self.layers.is_empty() {
            return Err(ArtifactError::Invalid("model has no layers".to_string()));
        }

        let mut width = self.input_width;
        for (idx, layer) in self.layers.iter().enumerate() {
            if layer.inputs() != width {
                return Err(ArtifactError::Invalid(format!(
                    "layer {} expects {} inputs but receives {}",
                    idx,
                    layer.inputs(),
                    width
                )));
            }
            if layer.units() == 0 {
                return Err(ArtifactError::Invalid(format!("layer {} has no units", idx)));
            }
            if let Some(row) = layer.kernel.iter().position(|r| r.len() != layer.units()) {
                return Err(ArtifactError::Invalid(format!(
                    "layer {} kernel row {} has {} weights, bias has {}",
                    idx,
                    row,
                    layer.kernel[row].len(),
                    layer.units()
                )));
            }
            width = layer.units();
        }

        Ok(())
    }
}

impl Predictor for DenseModel {
    fn input_width(&self) -> usize {
        self.input_width
    }

    fn predict(&self, batch: &[Vec<f32>]) -> Result<Vec<Vec<f32>>, ArtifactError> {
        batch
            .iter()
            .map(|row| {
                if row.len() != self.input_width {
                    return Err(ArtifactError::Shape {
                        what: "model",
                        expected: self.input_width,
                        actual: row.len(),
                    });
                }
                let out = self
                    .layers
                    .iter()
                    .fold(row.clone(), |acc, layer| layer.forward(&acc));
                if out.iter().any(|v| !v.is_finite()) {
                    return Err(ArtifactError::Inference(
                        "model produced a non-finite output".to_string(),
                    ));
                }
                Ok(out)
            })
            .collect()
    }
}
