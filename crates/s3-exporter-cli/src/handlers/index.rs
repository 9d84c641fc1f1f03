//! Landing page

use crate::AppState;
use axum::{extract::State, response::Html};
use std::sync::Arc;

/// Small HTML page linking the exporter's endpoints
pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let config = &state.config;
    Html(format!(
        r#"<html>
<head><title>S3 Exporter</title></head>
<body>
<h1>S3 Exporter</h1>
<p><a href="{probe}?bucket=BUCKET&amp;prefix=PREFIX">Query metrics for objects in BUCKET that match PREFIX</a></p>
<p><a href="{metrics}">Metrics</a></p>
<p><a href="{discovery}">Bucket discovery</a></p>
</body>
</html>
"#,
        probe = config.probe_path,
        metrics = config.metrics_path,
        discovery = config.discovery_path,
    ))
}
