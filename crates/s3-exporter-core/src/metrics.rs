//! Metric descriptors and samples
//!
//! The descriptor table is fixed at compile time. A scrape picks the subset
//! matching its [`ListingMode`] and emits one [`Sample`] per metric.

use crate::ListingMode;

/// Namespace prefixed to every metric name
pub const NAMESPACE: &str = "s3";

const QUERY_LABELS: &[&str] = &["bucket", "prefix", "delimiter"];
const OBJECT_LABELS: &[&str] = &["bucket", "prefix"];

/// Which scrapes may emit a metric
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MetricScope {
    Always,
    Only(ListingMode),
}

impl MetricScope {
    pub fn applies_to(&self, mode: ListingMode) -> bool {
        match self {
            Self::Always => true,
            Self::Only(m) => *m == mode,
        }
    }
}

/// Static description of one gauge
#[derive(Debug, PartialEq, Eq)]
pub struct MetricDesc {
    /// Name without the namespace
    pub name: &'static str,
    pub help: &'static str,
    pub labels: &'static [&'static str],
    pub scope: MetricScope,
}

impl MetricDesc {
    /// Fully qualified name, e.g. `s3_objects`
    pub fn fq_name(&self) -> String {
        format!("{}_{}", NAMESPACE, self.name)
    }
}

pub static LIST_SUCCESS: MetricDesc = MetricDesc {
    name: "list_success",
    help: "If the ListObjects operation was a success",
    labels: QUERY_LABELS,
    scope: MetricScope::Always,
};

pub static LIST_DURATION: MetricDesc = MetricDesc {
    name: "list_duration_seconds",
    help: "The total duration of the list operation",
    labels: QUERY_LABELS,
    scope: MetricScope::Always,
};

pub static LAST_MODIFIED_OBJECT_DATE: MetricDesc = MetricDesc {
    name: "last_modified_object_date",
    help: "The last modified date of the object that was modified most recently",
    labels: OBJECT_LABELS,
    scope: MetricScope::Only(ListingMode::Object),
};

pub static LAST_MODIFIED_OBJECT_SIZE: MetricDesc = MetricDesc {
    name: "last_modified_object_size_bytes",
    help: "The size of the object that was modified most recently",
    labels: OBJECT_LABELS,
    scope: MetricScope::Only(ListingMode::Object),
};

pub static OBJECTS: MetricDesc = MetricDesc {
    name: "objects",
    help: "The total number of objects for the bucket/prefix combination",
    labels: OBJECT_LABELS,
    scope: MetricScope::Only(ListingMode::Object),
};

pub static OBJECTS_SIZE_SUM: MetricDesc = MetricDesc {
    name: "objects_size_sum_bytes",
    help: "The total size of all objects summed",
    labels: OBJECT_LABELS,
    scope: MetricScope::Only(ListingMode::Object),
};

pub static BIGGEST_OBJECT_SIZE: MetricDesc = MetricDesc {
    name: "biggest_object_size_bytes",
    help: "The size of the biggest object",
    labels: OBJECT_LABELS,
    scope: MetricScope::Only(ListingMode::Object),
};

pub static COMMON_PREFIXES: MetricDesc = MetricDesc {
    name: "common_prefixes",
    help: "A count of all the keys between the prefix and the next occurrence of the string specified by the delimiter",
    labels: QUERY_LABELS,
    scope: MetricScope::Only(ListingMode::Prefix),
};

static ALL: [&MetricDesc; 8] = [
    &LIST_SUCCESS,
    &LIST_DURATION,
    &LAST_MODIFIED_OBJECT_DATE,
    &LAST_MODIFIED_OBJECT_SIZE,
    &OBJECTS,
    &OBJECTS_SIZE_SUM,
    &BIGGEST_OBJECT_SIZE,
    &COMMON_PREFIXES,
];

/// Every metric the exporter can emit
pub fn descriptors() -> &'static [&'static MetricDesc] {
    &ALL
}

/// Metrics a scrape in `mode` may emit
pub fn descriptors_for(mode: ListingMode) -> Vec<&'static MetricDesc> {
    ALL.iter()
        .copied()
        .filter(|d| d.scope.applies_to(mode))
        .collect()
}

/// One emitted value. `label_values` line up with `desc.labels`.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    pub desc: &'static MetricDesc,
    pub value: f64,
    pub label_values: Vec<String>,
}

impl Sample {
    pub fn new(desc: &'static MetricDesc, value: f64, label_values: Vec<String>) -> Self {
        debug_assert_eq!(desc.labels.len(), label_values.len());
        Self {
            desc,
            value,
            label_values,
        }
    }

    /// Label name/value pairs
    pub fn labels(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.desc
            .labels
            .iter()
            .copied()
            .zip(self.label_values.iter().map(String::as_str))
    }

    /// Value of a single label
    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels().find(|(n, _)| *n == name).map(|(_, v)| v)
    }
}
