//! Application state

use crate::config::ExporterConfig;
use crate::exposition::ExporterMetrics;
use s3_exporter_core::Scraper;
use s3_exporter_store::{BucketLister, ObjectLister, S3Store};
use std::sync::Arc;
use tracing::info;

/// Application state shared across handlers
pub struct AppState {
    /// Exporter configuration
    pub config: ExporterConfig,
    /// Runs one listing per probe request
    pub scraper: Scraper,
    /// Bucket enumeration for service discovery
    pub buckets: Arc<dyn BucketLister>,
    /// The exporter's own metrics
    pub telemetry: ExporterMetrics,
}

impl AppState {
    /// Create the state with an S3 client built from the configuration
    pub async fn new(config: ExporterConfig) -> anyhow::Result<Self> {
        let store = Arc::new(S3Store::new(&config.s3).await?);

        match config.s3.resolved_endpoint() {
            Some(endpoint) => info!(endpoint = %endpoint, "Using custom S3 endpoint"),
            None => info!("Using default S3 endpoint resolution"),
        }

        Self::with_store(config, store.clone(), store)
    }

    /// Create the state around existing store backends
    pub fn with_store(
        config: ExporterConfig,
        objects: Arc<dyn ObjectLister>,
        buckets: Arc<dyn BucketLister>,
    ) -> anyhow::Result<Self> {
        let mut scraper = Scraper::new(objects);
        if let Some(timeout) = config.probe_timeout {
            scraper = scraper.with_timeout(timeout);
        }

        Ok(Self {
            config,
            scraper,
            buckets,
            telemetry: ExporterMetrics::new()?,
        })
    }
}
