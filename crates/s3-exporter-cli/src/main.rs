//! S3 Exporter - Prometheus probe exporter for S3 buckets

use clap::{Parser, ValueEnum};
use s3_exporter_cli::{run_server_with_shutdown, shutdown_signal, ExporterConfig};
use s3_exporter_store::S3Config;
use std::time::Duration;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "s3-exporter")]
#[command(about = "Prometheus exporter for S3 bucket and prefix statistics")]
#[command(version)]
struct Args {
    /// Address to listen on for web interface and telemetry
    #[arg(long = "web.listen-address", default_value = "0.0.0.0:9340", env = "S3_EXPORTER_WEB_LISTEN_ADDRESS")]
    listen_address: String,

    /// Path under which to expose the exporter's own metrics
    #[arg(long = "web.metrics-path", default_value = "/metrics", env = "S3_EXPORTER_WEB_METRICS_PATH")]
    metrics_path: String,

    /// Path under which to expose the probe endpoint
    #[arg(long = "web.probe-path", default_value = "/probe", env = "S3_EXPORTER_WEB_PROBE_PATH")]
    probe_path: String,

    /// Path under which to expose the service discovery endpoint
    #[arg(long = "web.discovery-path", default_value = "/discovery", env = "S3_EXPORTER_WEB_DISCOVERY_PATH")]
    discovery_path: String,

    /// Seconds subtracted from the scrape timeout Prometheus announces
    #[arg(long = "web.timeout-offset", default_value_t = 0.5, env = "S3_EXPORTER_WEB_TIMEOUT_OFFSET")]
    timeout_offset: f64,

    /// Upper bound in seconds for one probe, 0 disables it
    #[arg(long = "probe.timeout", default_value_t = 60.0, env = "S3_EXPORTER_PROBE_TIMEOUT")]
    probe_timeout: f64,

    /// Custom endpoint URL
    #[arg(long = "s3.endpoint-url", env = "S3_EXPORTER_S3_ENDPOINT_URL")]
    endpoint_url: Option<String>,

    /// Use plain http for an endpoint given without a scheme
    #[arg(long = "s3.disable-ssl", env = "S3_EXPORTER_S3_DISABLE_SSL")]
    disable_ssl: bool,

    /// Address buckets as path segments instead of subdomains
    #[arg(long = "s3.force-path-style", env = "S3_EXPORTER_S3_FORCE_PATH_STYLE")]
    force_path_style: bool,

    /// Region, defaults to the AWS environment
    #[arg(long = "s3.region", env = "S3_EXPORTER_S3_REGION")]
    region: Option<String>,

    /// Attempts per S3 request, including the first
    #[arg(long = "s3.max-attempts", default_value_t = 3, env = "S3_EXPORTER_S3_MAX_ATTEMPTS")]
    max_attempts: u32,

    /// Log output format
    #[arg(long = "log.format", value_enum, default_value_t = LogFormat::Text, env = "S3_EXPORTER_LOG_FORMAT")]
    log_format: LogFormat,

    /// Enable debug logging
    #[arg(short, long, env = "S3_EXPORTER_DEBUG")]
    debug: bool,
}

impl Args {
    fn into_config(self) -> anyhow::Result<ExporterConfig> {
        let timeout_offset = Duration::try_from_secs_f64(self.timeout_offset)
            .map_err(|e| anyhow::anyhow!("invalid --web.timeout-offset: {e}"))?;
        let probe_timeout = Duration::try_from_secs_f64(self.probe_timeout)
            .map_err(|e| anyhow::anyhow!("invalid --probe.timeout: {e}"))?;

        Ok(ExporterConfig {
            listen_address: self.listen_address,
            metrics_path: self.metrics_path,
            probe_path: self.probe_path,
            discovery_path: self.discovery_path,
            probe_timeout: Some(probe_timeout).filter(|t| !t.is_zero()),
            timeout_offset,
            s3: S3Config {
                endpoint_url: self.endpoint_url,
                disable_ssl: self.disable_ssl,
                force_path_style: self.force_path_style,
                region: self.region,
                max_attempts: self.max_attempts,
                ..Default::default()
            },
        })
    }
}

fn init_tracing(format: LogFormat, debug: bool) -> anyhow::Result<()> {
    let level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "s3_exporter_cli={level},s3_exporter_core={level},s3_exporter_store={level},tower_http=debug"
        )
        .into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry.with(fmt::layer().with_target(true)).try_init(),
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
    }
    .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(args.log_format, args.debug)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting S3 exporter");

    let config = args.into_config()?;
    run_server_with_shutdown(config, shutdown_signal()).await
}
