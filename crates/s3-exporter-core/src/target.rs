//! Probe targets and listing modes

use crate::{CoreError, Result};
use s3_exporter_store::ListingQuery;
use std::fmt;

/// Metric shape of a scrape, fixed by whether a delimiter was supplied
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListingMode {
    /// No delimiter: per-object statistics
    Object,
    /// Delimiter set: common prefix count only
    Prefix,
}

impl ListingMode {
    pub fn for_delimiter(delimiter: &str) -> Self {
        if delimiter.is_empty() {
            Self::Object
        } else {
            Self::Prefix
        }
    }
}

impl fmt::Display for ListingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object => f.write_str("object"),
            Self::Prefix => f.write_str("prefix"),
        }
    }
}

/// A validated bucket/prefix/delimiter combination to scrape
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeTarget {
    bucket: String,
    prefix: String,
    delimiter: String,
    mode: ListingMode,
}

impl ProbeTarget {
    /// Validate probe parameters. The bucket must be non-empty.
    pub fn new(
        bucket: impl Into<String>,
        prefix: impl Into<String>,
        delimiter: impl Into<String>,
    ) -> Result<Self> {
        let bucket = bucket.into();
        if bucket.is_empty() {
            return Err(CoreError::MissingBucket);
        }
        let delimiter = delimiter.into();
        let mode = ListingMode::for_delimiter(&delimiter);

        Ok(Self {
            bucket,
            prefix: prefix.into(),
            delimiter,
            mode,
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Mode decided once, when the target was built
    pub fn mode(&self) -> ListingMode {
        self.mode
    }

    /// First-page query for this target
    pub fn to_query(&self) -> ListingQuery {
        ListingQuery::new(self.bucket.clone())
            .with_prefix(self.prefix.clone())
            .with_delimiter(self.delimiter.clone())
    }
}
