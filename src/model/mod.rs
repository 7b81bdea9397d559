pub mod dense;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod scaler;

pub use dense::DenseModel;
pub use scaler::Scaler;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::ArtifactError;

/// A loaded, read-only inference model.
pub trait Predictor: Send + Sync {
    /// Number of features each input row must have.
    fn input_width(&self) -> usize;

    /// Run the model on a batch of rows, returning one output row per input.
    fn predict(&self, batch: &[Vec<f32>]) -> Result<Vec<Vec<f32>>, ArtifactError>;
}

/// Load the model at `path`, choosing the loader by file extension.
pub fn load_model(path: &Path) -> Result<Arc<dyn Predictor>, ArtifactError> {
    let path = resolve_artifact_path(path)?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "json" => Ok(Arc::new(DenseModel::from_path(&path)?)),
        #[cfg(feature = "onnx")]
        "onnx" => Ok(Arc::new(onnx::OnnxModel::from_path(
            &path,
            crate::features::FEATURE_COUNT,
        )?)),
        other => Err(ArtifactError::UnsupportedFormat(format!(
            "{} (extension {:?})",
            path.display(),
            other
        ))),
    }
}

pub fn load_scaler(path: &Path) -> Result<Scaler, ArtifactError> {
    let path = resolve_artifact_path(path)?;
    Scaler::from_path(&path)
}

/// Resolve a relative artifact path against the working directory, then
/// against the directory holding the executable.
pub fn resolve_artifact_path(path: &Path) -> Result<PathBuf, ArtifactError> {
    if path.is_absolute() {
        return if path.exists() {
            Ok(path.to_path_buf())
        } else {
            Err(ArtifactError::NotFound(path.to_path_buf()))
        };
    }

    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));

    let candidates = std::env::current_dir()
        .ok()
        .into_iter()
        .chain(exe_dir)
        .map(|dir| dir.join(path));

    for candidate in candidates {
        if candidate.exists() {
            return Ok(candidate);
        }
    }

    Err(ArtifactError::NotFound(path.to_path_buf()))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ArtifactError::Json {
        path: path.to_path_buf(),
        source,
    })
}
