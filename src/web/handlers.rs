use axum::{
    extract::{rejection::FormRejection, State},
    response::Html,
    Form, Json,
};
use chrono::{DateTime, Utc};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::PredictError;
use crate::features::{encode, PatientForm};
use crate::model::{Predictor, Scaler};
use crate::web::page;

#[derive(Clone)]
pub struct AppState {
    pub model: Arc<dyn Predictor>,
    pub scaler: Option<Scaler>,
    pub info: ArtifactInfo,
}

#[derive(Debug, Clone)]
pub struct ArtifactInfo {
    pub model_path: PathBuf,
    pub scaler_path: Option<PathBuf>,
    pub loaded_at: DateTime<Utc>,
}

/// Encode a submission, scale it if a scaler is loaded, and run the model.
pub fn run_prediction(state: &AppState, form: &PatientForm) -> Result<f32, PredictError> {
    let features = encode(form)?;
    tracing::debug!(
        "Encoded features {:?}",
        features.named().collect::<Vec<_>>()
    );

    let expected = state.model.input_width();
    if features.len() != expected {
        return Err(PredictError::ShapeMismatch {
            expected,
            actual: features.len(),
        });
    }

    let mut batch = vec![features.to_vec()];
    if let Some(scaler) = &state.scaler {
        batch = scaler.transform(&batch)?;
    }

    let output = state.model.predict(&batch)?;
    output
        .first()
        .and_then(|row| row.first())
        .copied()
        .ok_or_else(|| PredictError::Failure("model returned an empty prediction".to_string()))
}

pub async fn home() -> Html<String> {
    Html(page::render(""))
}

pub async fn predict(
    State(state): State<Arc<AppState>>,
    form: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Result<Html<String>, PredictError> {
    let Form(pairs) = form.map_err(|e| PredictError::InvalidInput(e.body_text()))?;
    let form = PatientForm::from_pairs(pairs);

    let probability = run_prediction(&state, &form)?;
    tracing::info!("Predicted stroke probability {}", probability);

    Ok(Html(page::render(&probability.to_string())))
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let scaler = match (&state.scaler, &state.info.scaler_path) {
        (Some(scaler), Some(path)) => json!({
            "path": path.display().to_string(),
            "kind": scaler.kind(),
            "width": scaler.width(),
        }),
        _ => serde_json::Value::Null,
    };

    Json(json!({
        "status": "ok",
        "service": "stroke_risk_service",
        "model": {
            "path": state.info.model_path.display().to_string(),
            "input_width": state.model.input_width(),
            "loaded_at": state.info.loaded_at.to_rfc3339(),
        },
        "scaler": scaler,
    }))
}
