//! Exporter self-metrics endpoint

use crate::exposition;
use crate::{ApiError, AppState};
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

/// Serve the exporter's own metrics
pub async fn exporter_metrics(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let body = state.telemetry.render()?;
    Ok(([(header::CONTENT_TYPE, exposition::content_type())], body).into_response())
}
