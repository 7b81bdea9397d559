//! ONNX inference wrapper (pure Rust via `tract-onnx`).

use std::path::Path;

use tract_onnx::prelude::*;

use crate::error::ArtifactError;
use crate::model::Predictor;

pub struct OnnxModel {
    plan: TypedRunnableModel<TypedModel>,
    input_width: usize,
}

impl std::fmt::Debug for OnnxModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxModel")
            .field("input_width", &self.input_width)
            .finish()
    }
}

impl OnnxModel {
    /// Load an ONNX model and specialize it to a fixed `[1, input_width]` f32 input.
    pub fn from_path(path: &Path, input_width: usize) -> Result<Self, ArtifactError> {
        if input_width == 0 {
            return Err(ArtifactError::Invalid("input_width must be > 0".to_string()));
        }

        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .map_err(|e| ArtifactError::Invalid(format!("onnx load failed: {e}")))?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(f32::datum_type(), tvec!(1, input_width)),
            )
            .map_err(|e| ArtifactError::Invalid(format!("onnx input fact failed: {e}")))?
            .into_optimized()
            .map_err(|e| ArtifactError::Invalid(format!("onnx optimize failed: {e}")))?
            .into_runnable()
            .map_err(|e| ArtifactError::Invalid(format!("onnx runnable failed: {e}")))?;

        tracing::debug!(
            "Loaded ONNX model from {} ({} inputs)",
            path.display(),
            input_width
        );

        Ok(Self { plan, input_width })
    }

    fn predict_row(&self, row: &[f32]) -> Result<Vec<f32>, ArtifactError> {
        if row.len() != self.input_width {
            return Err(ArtifactError::Shape {
                what: "model",
                expected: self.input_width,
                actual: row.len(),
            });
        }

        let input = tract_ndarray::Array2::from_shape_vec((1, self.input_width), row.to_vec())
            .map_err(|e| ArtifactError::Inference(format!("onnx input build failed: {e}")))?
            .into_tvalue();

        let outputs = self
            .plan
            .run(tvec!(input))
            .map_err(|e| ArtifactError::Inference(format!("onnx run failed: {e}")))?;
        let first = outputs
            .first()
            .ok_or_else(|| ArtifactError::Inference("onnx produced no outputs".to_string()))?;
        let view = first
            .to_array_view::<f32>()
            .map_err(|e| ArtifactError::Inference(format!("onnx output decode failed: {e}")))?;

        Ok(view.iter().copied().collect())
    }
}

impl Predictor for OnnxModel {
    fn input_width(&self) -> usize {
        self.input_width
    }

    fn predict(&self, batch: &[Vec<f32>]) -> Result<Vec<Vec<f32>>, ArtifactError> {
        batch.iter().map(|row| self.predict_row(row)).collect()
    }
}
