pub mod handlers;
pub mod page;

pub use handlers::{AppState, ArtifactInfo};

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Form page
        .route("/", get(handlers::home))
        .route("/predict", post(handlers::predict))
        // Health check
        .route("/health", get(handlers::health_check))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
