//! Prometheus HTTP service discovery

use crate::{ApiError, AppState};
use axum::{
    extract::State,
    http::{header, HeaderMap, Uri},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Label Prometheus turns into the `bucket` probe parameter
pub const BUCKET_PARAM_LABEL: &str = "__param_bucket";

/// One target group of the HTTP SD document
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryTarget {
    pub targets: Vec<String>,
    pub labels: BTreeMap<String, String>,
}

/// Build one target group per named bucket, all pointing at `host`
pub fn discovery_targets(host: &str, buckets: &[String]) -> Vec<DiscoveryTarget> {
    buckets
        .iter()
        .filter(|name| !name.is_empty())
        .map(|name| DiscoveryTarget {
            targets: vec![host.to_string()],
            labels: BTreeMap::from([(BUCKET_PARAM_LABEL.to_string(), name.clone())]),
        })
        .collect()
}

/// Host the client addressed: the `Host` header, or the URI authority when
/// the request carries none (HTTP/2)
pub fn request_host(headers: &HeaderMap, uri: &Uri) -> String {
    headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .or_else(|| uri.authority().map(|authority| authority.to_string()))
        .unwrap_or_default()
}

/// List buckets as Prometheus HTTP SD targets
pub async fn discovery(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Response, ApiError> {
    let host = request_host(&headers, &uri);

    let buckets = state
        .buckets
        .list_buckets()
        .await
        .map_err(ApiError::Discovery)?;
    let targets = discovery_targets(&host, &buckets);
    debug!(buckets = buckets.len(), targets = targets.len(), "Discovery listing");

    let body = serde_json::to_vec(&targets)?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}
