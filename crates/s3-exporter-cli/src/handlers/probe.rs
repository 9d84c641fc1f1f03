//! Probe endpoint: one bucket listing per request

use crate::exposition;
use crate::{ApiError, AppState, ExporterConfig};
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
};
use s3_exporter_core::ProbeTarget;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info_span, Instrument};

/// Header Prometheus sets to announce its scrape timeout
pub const SCRAPE_TIMEOUT_HEADER: &str = "x-prometheus-scrape-timeout-seconds";

/// Probe query parameters
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProbeParams {
    pub bucket: String,
    pub prefix: String,
    pub delimiter: String,
}

impl ProbeParams {
    /// Collect parameters from raw query pairs, keeping the first value of
    /// a repeated key
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut bucket = None;
        let mut prefix = None;
        let mut delimiter = None;

        for (key, value) in pairs {
            let slot = match key.as_str() {
                "bucket" => &mut bucket,
                "prefix" => &mut prefix,
                "delimiter" => &mut delimiter,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }

        Self {
            bucket: bucket.unwrap_or_default(),
            prefix: prefix.unwrap_or_default(),
            delimiter: delimiter.unwrap_or_default(),
        }
    }
}

/// Run one scrape and return its metrics.
///
/// A failed listing still answers 200 with `s3_list_success 0`; only a
/// missing bucket is a client error. The scrape runs in its own task so a
/// client disconnect cancels it instead of dropping it, and the aborted
/// probe is still logged and counted.
pub async fn probe(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let params = ProbeParams::from_pairs(pairs);
    let target = ProbeTarget::new(params.bucket, params.prefix, params.delimiter)?;
    let timeout = scrape_timeout(&headers, &state.config);

    // Cancels the scrape task if this handler is dropped first
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let span = info_span!("probe", bucket = %target.bucket(), prefix = %target.prefix());
    let task_state = Arc::clone(&state);
    let scrape = tokio::spawn(
        async move {
            let outcome = task_state
                .scraper
                .scrape_within(&target, &cancel, timeout)
                .await;

            if let Some(err) = outcome.error() {
                error!(
                    bucket = %target.bucket(),
                    prefix = %target.prefix(),
                    delimiter = %target.delimiter(),
                    error = %err,
                    "Listing failed"
                );
            }
            task_state.telemetry.record_probe(outcome.is_success());
            outcome
        }
        .instrument(span),
    );

    let outcome = scrape
        .await
        .map_err(|e| ApiError::Internal(format!("scrape task failed: {e}")))?;

    let body = exposition::render(&outcome.samples())?;
    Ok(([(header::CONTENT_TYPE, exposition::content_type())], body).into_response())
}

/// Deadline for one probe.
///
/// Uses the scrape timeout announced by Prometheus minus the configured
/// offset, bounded by the configured probe timeout. A missing, malformed or
/// exhausted header value leaves the configured timeout in place.
pub fn scrape_timeout(headers: &HeaderMap, config: &ExporterConfig) -> Option<Duration> {
    let announced = headers
        .get(SCRAPE_TIMEOUT_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<f64>().ok())
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .and_then(|limit| limit.checked_sub(config.timeout_offset))
        .filter(|limit| !limit.is_zero());

    match (announced, config.probe_timeout) {
        (Some(announced), Some(configured)) => Some(announced.min(configured)),
        (Some(announced), None) => Some(announced),
        (None, configured) => configured,
    }
}
