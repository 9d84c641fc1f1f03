//! Listing request and response values

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Parameters of a single ListObjectsV2-style page request.
///
/// An empty `prefix` or `delimiter` means "no filter". Only
/// `continuation_token` changes between the pages of one enumeration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingQuery {
    /// Bucket name
    pub bucket: String,
    /// Key prefix filter
    pub prefix: String,
    /// Grouping delimiter
    pub delimiter: String,
    /// Token returned by the previous page
    pub continuation_token: Option<String>,
}

impl ListingQuery {
    /// Create a query for the whole bucket
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            ..Default::default()
        }
    }

    /// Set the key prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the delimiter
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Whether the query groups keys into common prefixes
    pub fn has_delimiter(&self) -> bool {
        !self.delimiter.is_empty()
    }
}

/// One listed object, reduced to what aggregation needs
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectRecord {
    /// Size in bytes
    pub size: u64,
    /// Last modified time, if the store reported one
    pub last_modified: Option<DateTime<Utc>>,
}

impl ObjectRecord {
    pub fn new(size: u64, last_modified: DateTime<Utc>) -> Self {
        Self {
            size,
            last_modified: Some(last_modified),
        }
    }
}

/// One page of a listing
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListPage {
    /// Objects returned on this page
    pub objects: Vec<ObjectRecord>,
    /// Number of common prefixes returned on this page
    pub common_prefix_count: usize,
    /// Token for the next page, `None` on the last page
    pub next_continuation_token: Option<String>,
}

impl ListPage {
    /// Whether another page follows this one
    pub fn has_next(&self) -> bool {
        self.next_continuation_token.is_some()
    }
}
