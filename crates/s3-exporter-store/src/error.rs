//! Error types for the s3-exporter-store crate

use thiserror::Error;

/// Result type alias using `StoreError`
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while talking to an object store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Bucket not found
    #[error("bucket not found: {0}")]
    NoSuchBucket(String),

    /// The store rejected or failed a listing request
    #[error("request failed: {0}")]
    Request(String),

    /// Continuation token not issued by this store
    #[error("invalid continuation token: {0}")]
    InvalidContinuationToken(String),

    /// Invalid client configuration
    #[error("configuration error: {0}")]
    Config(String),
}
