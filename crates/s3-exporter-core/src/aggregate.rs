//! Running aggregates over a listing

use chrono::{DateTime, Utc};
use s3_exporter_store::{ListPage, ObjectRecord};

/// Statistics folded from every page of one scrape.
///
/// While `object_count` is zero every object field stays at its initial
/// value. `common_prefix_count` accumulates independently of the mode.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AggregateState {
    pub object_count: u64,
    pub total_size_bytes: u64,
    pub biggest_object_size_bytes: u64,
    /// Timestamp of the most recently modified object, `None` until one is seen
    pub last_modified: Option<DateTime<Utc>>,
    pub last_modified_object_size_bytes: u64,
    pub common_prefix_count: u64,
}

impl AggregateState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one listed object.
    ///
    /// The most-recent object is replaced only by a strictly later timestamp,
    /// so on ties the first object seen keeps its size.
    pub fn fold_object(&mut self, object: &ObjectRecord) {
        self.object_count += 1;
        self.total_size_bytes = self.total_size_bytes.saturating_add(object.size);
        self.biggest_object_size_bytes = self.biggest_object_size_bytes.max(object.size);

        if let Some(modified) = object.last_modified {
            if self.last_modified.map_or(true, |current| modified > current) {
                self.last_modified = Some(modified);
                self.last_modified_object_size_bytes = object.size;
            }
        }
    }

    /// Fold every object and the common prefix count of a page
    pub fn fold_page(&mut self, page: &ListPage) {
        self.common_prefix_count += page.common_prefix_count as u64;
        for object in &page.objects {
            self.fold_object(object);
        }
    }

    /// Last modified time in unix seconds, 0 if no object carried one
    pub fn last_modified_unix_seconds(&self) -> i64 {
        self.last_modified.map_or(0, |t| t.timestamp())
    }
}
