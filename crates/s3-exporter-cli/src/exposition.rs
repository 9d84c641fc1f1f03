//! Prometheus text exposition
//!
//! Probe responses are rendered through a throwaway registry built from the
//! scrape's samples. The exporter's own metrics live in a long-lived
//! [`ExporterMetrics`] registry served on the metrics path.

use prometheus::{Encoder, GaugeVec, IntCounterVec, IntGaugeVec, Opts, Registry, TextEncoder};
use s3_exporter_core::{MetricDesc, Sample, NAMESPACE};

/// Content type of the text exposition format
pub fn content_type() -> String {
    TextEncoder::new().format_type().to_string()
}

/// Render one scrape's samples in the text exposition format
pub fn render(samples: &[Sample]) -> prometheus::Result<Vec<u8>> {
    let registry = Registry::new();
    let mut gauges: Vec<(&'static MetricDesc, GaugeVec)> = Vec::new();

    for sample in samples {
        let gauge = match gauges.iter().find(|(desc, _)| desc.name == sample.desc.name) {
            Some((_, gauge)) => gauge.clone(),
            None => {
                let gauge = GaugeVec::new(
                    Opts::new(sample.desc.name, sample.desc.help).namespace(NAMESPACE),
                    sample.desc.labels,
                )?;
                registry.register(Box::new(gauge.clone()))?;
                gauges.push((sample.desc, gauge.clone()));
                gauge
            }
        };

        let values: Vec<&str> = sample.label_values.iter().map(String::as_str).collect();
        gauge.get_metric_with_label_values(&values)?.set(sample.value);
    }

    encode(&registry)
}

fn encode(registry: &Registry) -> prometheus::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&registry.gather(), &mut buffer)?;
    Ok(buffer)
}

const EXPORTER_NAMESPACE: &str = "s3_exporter";

/// Process-wide metrics about the exporter itself
#[derive(Clone)]
pub struct ExporterMetrics {
    registry: Registry,
    probes: IntCounterVec,
}

impl ExporterMetrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let build_info = IntGaugeVec::new(
            Opts::new(
                "build_info",
                "A metric with a constant '1' value labeled by version from which s3_exporter was built",
            )
            .namespace(EXPORTER_NAMESPACE),
            &["version"],
        )?;
        build_info
            .get_metric_with_label_values(&[env!("CARGO_PKG_VERSION")])?
            .set(1);

        let probes = IntCounterVec::new(
            Opts::new("probes_total", "Probe requests served, by listing result")
                .namespace(EXPORTER_NAMESPACE),
            &["result"],
        )?;

        registry.register(Box::new(build_info))?;
        registry.register(Box::new(probes.clone()))?;

        Ok(Self { registry, probes })
    }

    /// Count one finished probe
    pub fn record_probe(&self, success: bool) {
        let result = if success { "success" } else { "failure" };
        if let Ok(counter) = self.probes.get_metric_with_label_values(&[result]) {
            counter.inc();
        }
    }

    pub fn render(&self) -> prometheus::Result<Vec<u8>> {
        encode(&self.registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use s3_exporter_core::metrics::{COMMON_PREFIXES, LIST_SUCCESS, OBJECTS};

    fn text(samples: &[Sample]) -> String {
        String::from_utf8(render(samples).unwrap()).unwrap()
    }

    #[test]
    fn test_render_object_sample() {
        let out = text(&[Sample::new(&OBJECTS, 2.0, vec!["b".into(), "p".into()])]);

        assert!(out.contains("# HELP s3_objects The total number of objects"));
        assert!(out.contains("# TYPE s3_objects gauge"));
        assert!(out.contains(r#"s3_objects{bucket="b",prefix="p"} 2"#));
    }

    #[test]
    fn test_render_groups_samples_by_metric() {
        let out = text(&[
            Sample::new(&LIST_SUCCESS, 1.0, vec!["b1".into(), "".into(), "/".into()]),
            Sample::new(&COMMON_PREFIXES, 3.0, vec!["b1".into(), "".into(), "/".into()]),
            Sample::new(&LIST_SUCCESS, 0.0, vec!["b2".into(), "".into(), "/".into()]),
        ]);

        assert_eq!(out.matches("# TYPE s3_list_success gauge").count(), 1);
        assert!(out.contains(r#"bucket="b1""#));
        assert!(out.contains(r#"bucket="b2""#));
        assert!(out.contains("s3_common_prefixes{"));
    }

    #[test]
    fn test_render_empty() {
        assert!(text(&[]).is_empty());
    }

    #[test]
    fn test_exporter_metrics() {
        let metrics = ExporterMetrics::new().unwrap();
        metrics.record_probe(true);
        metrics.record_probe(false);
        metrics.record_probe(false);

        let out = String::from_utf8(metrics.render().unwrap()).unwrap();
        assert!(out.contains("s3_exporter_build_info{"));
        assert!(out.contains(r#"s3_exporter_probes_total{result="success"} 1"#));
        assert!(out.contains(r#"s3_exporter_probes_total{result="failure"} 2"#));
    }
}
