//! One scrape: enumerate, fold, emit

use crate::metrics::{
    Sample, BIGGEST_OBJECT_SIZE, COMMON_PREFIXES, LAST_MODIFIED_OBJECT_DATE,
    LAST_MODIFIED_OBJECT_SIZE, LIST_DURATION, LIST_SUCCESS, OBJECTS, OBJECTS_SIZE_SUM,
};
use crate::{AggregateState, CoreError, ListingMode, Paginator, ProbeTarget, Result};
use s3_exporter_store::ObjectLister;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

/// Runs scrapes against a shared listing capability.
///
/// Holds no per-scrape state, so one `Scraper` serves concurrent requests.
#[derive(Clone)]
pub struct Scraper {
    lister: Arc<dyn ObjectLister>,
    timeout: Option<Duration>,
}

impl Scraper {
    pub fn new(lister: Arc<dyn ObjectLister>) -> Self {
        Self {
            lister,
            timeout: None,
        }
    }

    /// Default deadline for scrapes started with [`Scraper::scrape`]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Scrape `target` with the default deadline
    pub async fn scrape(&self, target: &ProbeTarget, cancel: &CancellationToken) -> ScrapeOutcome {
        self.scrape_within(target, cancel, self.timeout).await
    }

    /// Scrape `target`, giving up when `timeout` expires or `cancel` fires.
    ///
    /// Never returns a partial aggregate: any failure discards the pages
    /// folded so far.
    #[instrument(skip(self, cancel), fields(bucket = %target.bucket(), mode = %target.mode()))]
    pub async fn scrape_within(
        &self,
        target: &ProbeTarget,
        cancel: &CancellationToken,
        timeout: Option<Duration>,
    ) -> ScrapeOutcome {
        let start = Instant::now();
        let enumeration = enumerate(self.lister.as_ref(), target, cancel.clone());

        let result = match timeout {
            Some(limit) => tokio::time::timeout(limit, enumeration)
                .await
                .unwrap_or(Err(CoreError::Timeout(limit))),
            None => enumeration.await,
        };
        let duration = start.elapsed();

        debug!(
            success = result.is_ok(),
            duration_ms = duration.as_millis() as u64,
            "Scrape finished"
        );

        ScrapeOutcome {
            target: target.clone(),
            duration,
            result,
        }
    }
}

/// Fold every page of the target's listing into a fresh aggregate
pub async fn enumerate(
    lister: &dyn ObjectLister,
    target: &ProbeTarget,
    cancel: CancellationToken,
) -> Result<AggregateState> {
    let mut state = AggregateState::new();
    let mut pages = Paginator::new(lister, target.to_query(), cancel);

    while let Some(page) = pages.next_page().await {
        state.fold_page(&page?);
    }

    Ok(state)
}

/// Result of one scrape, consumed by the emitter
#[derive(Debug)]
pub struct ScrapeOutcome {
    pub target: ProbeTarget,
    /// Wall-clock time of the paginated enumeration
    pub duration: Duration,
    pub result: Result<AggregateState>,
}

impl ScrapeOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration.as_secs_f64()
    }

    /// The aggregate, only for successful scrapes
    pub fn aggregate(&self) -> Option<&AggregateState> {
        self.result.as_ref().ok()
    }

    pub fn error(&self) -> Option<&CoreError> {
        self.result.as_ref().err()
    }

    /// Metric samples for this scrape.
    ///
    /// A failed scrape yields only `s3_list_success` = 0. A successful one
    /// yields success, duration and the metric set of the target's mode.
    pub fn samples(&self) -> Vec<Sample> {
        let target = &self.target;
        let query_labels = || {
            vec![
                target.bucket().to_string(),
                target.prefix().to_string(),
                target.delimiter().to_string(),
            ]
        };
        let object_labels = || vec![target.bucket().to_string(), target.prefix().to_string()];

        let state = match &self.result {
            Ok(state) => state,
            Err(_) => return vec![Sample::new(&LIST_SUCCESS, 0.0, query_labels())],
        };

        let mut samples = vec![
            Sample::new(&LIST_SUCCESS, 1.0, query_labels()),
            Sample::new(&LIST_DURATION, self.duration_seconds(), query_labels()),
        ];

        match target.mode() {
            ListingMode::Object => samples.extend([
                Sample::new(
                    &LAST_MODIFIED_OBJECT_DATE,
                    state.last_modified_unix_seconds() as f64,
                    object_labels(),
                ),
                Sample::new(
                    &LAST_MODIFIED_OBJECT_SIZE,
                    state.last_modified_object_size_bytes as f64,
                    object_labels(),
                ),
                Sample::new(&OBJECTS, state.object_count as f64, object_labels()),
                Sample::new(
                    &BIGGEST_OBJECT_SIZE,
                    state.biggest_object_size_bytes as f64,
                    object_labels(),
                ),
                Sample::new(&OBJECTS_SIZE_SUM, state.total_size_bytes as f64, object_labels()),
            ]),
            ListingMode::Prefix => samples.push(Sample::new(
                &COMMON_PREFIXES,
                state.common_prefix_count as f64,
                query_labels(),
            )),
        }

        samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use s3_exporter_store::StoreError;

    fn outcome(delimiter: &str, result: Result<AggregateState>) -> ScrapeOutcome {
        ScrapeOutcome {
            target: ProbeTarget::new("b", "p", delimiter).unwrap(),
            duration: Duration::from_millis(250),
            result,
        }
    }

    fn names(samples: &[Sample]) -> Vec<String> {
        samples.iter().map(|s| s.desc.fq_name()).collect()
    }

    #[rstest]
    #[case::object_mode("", true)]
    #[case::prefix_mode("/", false)]
    #[case::multi_char_delimiter("--", false)]
    fn test_mode_exclusivity(#[case] delimiter: &str, #[case] object_mode: bool) {
        let samples = outcome(delimiter, Ok(AggregateState::new())).samples();
        let names = names(&samples);

        let object_metrics = [
            "s3_objects",
            "s3_objects_size_sum_bytes",
            "s3_biggest_object_size_bytes",
            "s3_last_modified_object_date",
            "s3_last_modified_object_size_bytes",
        ];
        for metric in object_metrics {
            assert_eq!(names.contains(&metric.to_string()), object_mode, "{}", metric);
        }
        assert_eq!(
            names.contains(&"s3_common_prefixes".to_string()),
            !object_mode
        );
        assert!(names.contains(&"s3_list_success".to_string()));
        assert!(names.contains(&"s3_list_duration_seconds".to_string()));
    }

    #[rstest]
    #[case::object_mode("")]
    #[case::prefix_mode("/")]
    fn test_failure_emits_only_success(#[case] delimiter: &str) {
        let failed = outcome(
            delimiter,
            Err(CoreError::Store(StoreError::Request("boom".into()))),
        );
        let samples = failed.samples();

        assert!(!failed.is_success());
        assert!(failed.aggregate().is_none());
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].desc.fq_name(), "s3_list_success");
        assert_eq!(samples[0].value, 0.0);
        assert_eq!(samples[0].label("bucket"), Some("b"));
        assert_eq!(samples[0].label("prefix"), Some("p"));
    }

    #[test]
    fn test_success_labels_and_values() {
        let state = AggregateState {
            object_count: 2,
            total_size_bytes: 30,
            biggest_object_size_bytes: 20,
            last_modified: chrono::DateTime::from_timestamp(1_700_000_000, 0),
            last_modified_object_size_bytes: 20,
            common_prefix_count: 0,
        };
        let samples = outcome("", Ok(state)).samples();

        let value = |name: &str| {
            samples
                .iter()
                .find(|s| s.desc.fq_name() == name)
                .map(|s| s.value)
                .unwrap()
        };
        assert_eq!(value("s3_list_success"), 1.0);
        assert_eq!(value("s3_list_duration_seconds"), 0.25);
        assert_eq!(value("s3_objects"), 2.0);
        assert_eq!(value("s3_objects_size_sum_bytes"), 30.0);
        assert_eq!(value("s3_biggest_object_size_bytes"), 20.0);
        assert_eq!(value("s3_last_modified_object_date"), 1_700_000_000.0);
        assert_eq!(value("s3_last_modified_object_size_bytes"), 20.0);

        for sample in &samples {
            assert_eq!(sample.label_values.len(), sample.desc.labels.len());
        }
        let success = samples.iter().find(|s| s.desc.name == "list_success").unwrap();
        assert_eq!(success.label("delimiter"), Some(""));
    }

    #[test]
    fn test_prefix_mode_value() {
        let state = AggregateState {
            common_prefix_count: 4,
            ..AggregateState::default()
        };
        let samples = outcome("/", Ok(state)).samples();
        let prefixes = samples
            .iter()
            .find(|s| s.desc.name == "common_prefixes")
            .unwrap();

        assert_eq!(prefixes.value, 4.0);
        assert_eq!(prefixes.label("delimiter"), Some("/"));
    }
}
