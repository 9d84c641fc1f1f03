//! Exporter configuration

use s3_exporter_store::S3Config;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Exporter server configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExporterConfig {
    /// Address to listen on, `:port` binds all interfaces
    pub listen_address: String,
    /// Path of the exporter's own metrics
    pub metrics_path: String,
    /// Path of the probe endpoint
    pub probe_path: String,
    /// Path of the service discovery endpoint
    pub discovery_path: String,
    /// Upper bound for a single scrape, `None` for no limit
    pub probe_timeout: Option<Duration>,
    /// Subtracted from the scrape timeout Prometheus announces
    pub timeout_offset: Duration,
    /// Object store client settings
    pub s3: S3Config,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            listen_address: "0.0.0.0:9340".to_string(),
            metrics_path: "/metrics".to_string(),
            probe_path: "/probe".to_string(),
            discovery_path: "/discovery".to_string(),
            probe_timeout: Some(Duration::from_secs(60)),
            timeout_offset: Duration::from_millis(500),
            s3: S3Config::default(),
        }
    }
}

impl ExporterConfig {
    /// Get the bind address
    pub fn bind_addr(&self) -> String {
        if self.listen_address.starts_with(':') {
            format!("0.0.0.0{}", self.listen_address)
        } else {
            self.listen_address.clone()
        }
    }

    /// Check that the HTTP paths can be routed together
    pub fn validate(&self) -> anyhow::Result<()> {
        let paths = [
            ("metrics", &self.metrics_path),
            ("probe", &self.probe_path),
            ("discovery", &self.discovery_path),
        ];

        for (i, (name, path)) in paths.iter().enumerate() {
            if !path.starts_with('/') || path.len() < 2 {
                anyhow::bail!("{} path must start with '/' and not be the root: {:?}", name, path);
            }
            if let Some((other, _)) = paths[..i].iter().find(|(_, p)| p == path) {
                anyhow::bail!("{} and {} paths are both {:?}", other, name, path);
            }
        }

        Ok(())
    }
}
