//! HTTP error responses

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use s3_exporter_core::CoreError;
use s3_exporter_store::StoreError;
use thiserror::Error;

/// API error type
#[derive(Error, Debug)]
pub enum ApiError {
    /// Required query parameter absent or empty
    #[error("{0} parameter is missing")]
    MissingParameter(&'static str),

    /// Bucket enumeration for discovery failed
    #[error("error listing buckets")]
    Discovery(#[source] StoreError),

    /// Discovery document could not be serialized
    #[error("error marshalling json")]
    Json(#[from] serde_json::Error),

    /// Metrics could not be encoded
    #[error("error encoding metrics")]
    Encode(#[from] prometheus::Error),

    /// The scrape task panicked or was aborted
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Get the HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingParameter(_) => StatusCode::BAD_REQUEST,
            Self::Discovery(_) | Self::Json(_) | Self::Encode(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::MissingBucket => Self::MissingParameter("bucket"),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = ?self, "Request failed");
        }

        (
            status,
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
                (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
            ],
            format!("{}\n", self),
        )
            .into_response()
    }
}
