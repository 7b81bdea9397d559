mod config;
mod error;
mod features;
mod model;
mod web;

use chrono::Utc;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::features::FEATURE_COUNT;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stroke_risk_service=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = config::Config::from_env()?;
    tracing::info!(
        "Starting stroke risk service on {} with model {}",
        config.bind_addr(),
        config.model_path.display()
    );

    // Load artifacts once; handlers only ever read them
    let model = model::load_model(&config.model_path).inspect_err(|e| {
        tracing::error!("Failed to load model: {}", e);
    })?;
    if model.input_width() != FEATURE_COUNT {
        tracing::warn!(
            "Model expects {} features but the form encodes {}; predictions will report a shape mismatch",
            model.input_width(),
            FEATURE_COUNT
        );
    }

    let scaler = match &config.scaler_path {
        Some(path) => {
            let scaler = model::load_scaler(path).inspect_err(|e| {
                tracing::error!("Failed to load scaler: {}", e);
            })?;
            tracing::info!(
                "Scaler loaded from {} ({}, {} features)",
                path.display(),
                scaler.kind(),
                scaler.width()
            );
            Some(scaler)
        }
        None => None,
    };

    // Create shared state
    let state = Arc::new(web::AppState {
        model,
        scaler,
        info: web::ArtifactInfo {
            model_path: config.model_path.clone(),
            scaler_path: config.scaler_path.clone(),
            loaded_at: Utc::now(),
        },
    });

    let app = web::create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!("Listening on {}", config.bind_addr());

    axum::serve(listener, app).await?;

    Ok(())
}
