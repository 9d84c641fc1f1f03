//! # S3 Exporter
//!
//! Prometheus exporter that answers each probe with statistics about the
//! objects under one bucket and prefix.
//!
//! This crate provides:
//! - **Probe endpoint**: one paginated listing per request, rendered as metrics
//! - **Service discovery**: buckets as Prometheus HTTP SD targets
//! - **Self metrics**: build info and probe counters
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                    Prometheus                       │
//! │          (/probe?bucket=..., /discovery)            │
//! └─────────────────────────┬───────────────────────────┘
//!                           │
//! ┌─────────────────────────▼───────────────────────────┐
//! │                    s3-exporter                      │
//! ├─────────────────────────────────────────────────────┤
//! │  Request ID │ Logging │ Tracing │ Compression       │
//! ├─────────────────────────────────────────────────────┤
//! │        Probe / Discovery / Metrics handlers         │
//! ├─────────────────────────────────────────────────────┤
//! │                  s3-exporter-core                   │
//! │        (pagination, aggregation, samples)           │
//! ├─────────────────────────────────────────────────────┤
//! │                 s3-exporter-store                   │
//! │            (ListObjectsV2, ListBuckets)             │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod exposition;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ExporterConfig;
pub use error::ApiError;
pub use server::{run_server, run_server_with_shutdown, shutdown_signal};
pub use state::AppState;
