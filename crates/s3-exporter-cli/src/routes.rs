//! HTTP route definitions

use crate::{handlers, middleware, AppState};
use axum::{middleware as axum_middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

/// Create the main router
pub fn create_router(state: Arc<AppState>) -> Router {
    let config = &state.config;

    Router::new()
        .route("/", get(handlers::index))
        .route(&config.metrics_path, get(handlers::exporter_metrics))
        .route(&config.probe_path, get(handlers::probe))
        .route(&config.discovery_path, get(handlers::discovery))
        // Last layer is outermost: request ids are assigned before logging runs
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(axum_middleware::from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .with_state(Arc::clone(&state))
}
