//! Error types for the s3-exporter-core crate

use s3_exporter_store::StoreError;
use std::time::Duration;
use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that end a scrape
#[derive(Error, Debug)]
pub enum CoreError {
    /// Probe requested without a bucket
    #[error("bucket parameter is missing")]
    MissingBucket,

    /// A page request failed
    #[error("listing failed: {0}")]
    Store(#[from] StoreError),

    /// The caller went away or cancelled the scrape
    #[error("scrape cancelled")]
    Cancelled,

    /// The scrape ran past its deadline
    #[error("scrape timed out after {0:?}")]
    Timeout(Duration),
}
