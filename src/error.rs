use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use std::path::PathBuf;
use thiserror::Error;

use crate::web::page;

/// Everything that can go wrong between a form submission and a prediction.
///
/// The `Display` text is exactly what ends up in the page's result area.
#[derive(Error, Debug, PartialEq)]
pub enum PredictError {
    #[error("Missing input(s)")]
    MissingInput,

    #[error("Input shape mismatch")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Error: {0}")]
    Failure(String),
}

impl From<ArtifactError> for PredictError {
    fn from(err: ArtifactError) -> Self {
        match err {
            ArtifactError::Shape { expected, actual, .. } => {
                PredictError::ShapeMismatch { expected, actual }
            }
            other => PredictError::Failure(other.to_string()),
        }
    }
}

impl IntoResponse for PredictError {
    fn into_response(self) -> Response {
        match &self {
            PredictError::MissingInput | PredictError::InvalidInput(_) => {
                tracing::warn!("Rejected form submission: {}", self);
            }
            PredictError::ShapeMismatch { expected, actual } => {
                tracing::error!(
                    "Feature vector has {} values but the pipeline expects {}",
                    actual,
                    expected
                );
            }
            PredictError::Failure(_) => {
                tracing::error!("Prediction failed: {}", self);
            }
        }

        // The page is always rendered; errors never surface as a server fault
        (StatusCode::OK, Html(page::render(&self.to_string()))).into_response()
    }
}

/// Failures while loading or running the model and scaler artifacts.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("artifact not found: {0}")]
    NotFound(PathBuf),

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parsing error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid artifact: {0}")]
    Invalid(String),

    #[error("{what} expects {expected} values, got {actual}")]
    Shape {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("unsupported model format: {0}")]
    UnsupportedFormat(String),

    #[error("inference error: {0}")]
    Inference(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_category_prefix() {
        assert_eq!(PredictError::MissingInput.to_string(), "Missing input(s)");
        assert_eq!(
            PredictError::ShapeMismatch {
                expected: 21,
                actual: 20
            }
            .to_string(),
            "Input shape mismatch"
        );
        assert_eq!(
            PredictError::InvalidInput("age must be a number".into()).to_string(),
            "Invalid input: age must be a number"
        );
        assert_eq!(
            PredictError::Failure("boom".into()).to_string(),
            "Error: boom"
        );
    }

    #[test]
    fn artifact_shape_errors_become_shape_mismatch() {
        let err: PredictError = ArtifactError::Shape {
            what: "scaler",
            expected: 21,
            actual: 3,
        }
        .into();
        assert_eq!(
            err,
            PredictError::ShapeMismatch {
                expected: 21,
                actual: 3
            }
        );

        let err: PredictError = ArtifactError::Inference("nan".into()).into();
        assert_eq!(err.to_string(), "Error: inference error: nan");
    }

    #[test]
    fn error_response_is_a_page() {
        let response = PredictError::MissingInput.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
