//! In-memory object store for testing

use crate::{BucketLister, ListPage, ListingQuery, ObjectLister, ObjectRecord, Result, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Default page size, matching the S3 `max-keys` default
pub const DEFAULT_PAGE_SIZE: usize = 1000;

#[derive(Clone, Debug)]
struct StoredObject {
    size: u64,
    last_modified: DateTime<Utc>,
}

type Bucket = BTreeMap<String, StoredObject>;

/// An in-memory object store with S3 listing semantics.
///
/// Keys are listed in lexicographic order, `page_size` entries (objects plus
/// common prefixes) per page. The continuation token is the last key or
/// common prefix of the previous page. Clones share contents and counters.
#[derive(Clone)]
pub struct MemoryStore {
    buckets: Arc<RwLock<BTreeMap<String, Bucket>>>,
    page_size: usize,
    latency: Option<Duration>,
    fail_on_call: Option<usize>,
    calls: Arc<AtomicUsize>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self {
            buckets: Arc::new(RwLock::new(BTreeMap::new())),
            page_size: DEFAULT_PAGE_SIZE,
            latency: None,
            fail_on_call: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Set the maximum number of entries per page
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Delay every listing response
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Fail the n-th `list_page` call (1-based)
    pub fn with_failure_on_call(mut self, call: usize) -> Self {
        self.fail_on_call = Some(call);
        self
    }

    /// Add an empty bucket
    pub fn with_bucket(self, bucket: impl Into<String>) -> Self {
        self.create_bucket(bucket);
        self
    }

    /// Add an object, creating the bucket if needed
    pub fn with_object(
        self,
        bucket: &str,
        key: impl Into<String>,
        size: u64,
        last_modified: DateTime<Utc>,
    ) -> Self {
        self.put_object(bucket, key, size, last_modified);
        self
    }

    /// Create a bucket if it does not exist yet
    pub fn create_bucket(&self, bucket: impl Into<String>) {
        self.buckets.write().entry(bucket.into()).or_default();
    }

    /// Store an object, creating the bucket if needed
    pub fn put_object(
        &self,
        bucket: &str,
        key: impl Into<String>,
        size: u64,
        last_modified: DateTime<Utc>,
    ) {
        self.buckets
            .write()
            .entry(bucket.to_string())
            .or_default()
            .insert(key.into(), StoredObject { size, last_modified });
    }

    /// Number of `list_page` calls served so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn list(&self, query: &ListingQuery) -> Result<ListPage> {
        let buckets = self.buckets.read();
        let bucket = buckets
            .get(&query.bucket)
            .ok_or_else(|| StoreError::NoSuchBucket(query.bucket.clone()))?;

        let token = query.continuation_token.as_deref();
        if let Some(token) = token {
            if !token.starts_with(query.prefix.as_str()) {
                return Err(StoreError::InvalidContinuationToken(token.to_string()));
            }
        }

        let start = match token {
            Some(token) => Bound::Excluded(token),
            None => Bound::Unbounded,
        };
        // A token ending in the delimiter is a common prefix already reported
        let resumed_prefix =
            token.filter(|t| query.has_delimiter() && t.ends_with(query.delimiter.as_str()));

        let mut page = ListPage::default();
        let mut last_prefix: Option<String> = None;
        let mut last_entry: Option<String> = None;

        for (key, object) in bucket.range::<str, _>((start, Bound::Unbounded)) {
            if !key.starts_with(query.prefix.as_str()) {
                continue;
            }
            if resumed_prefix.is_some_and(|p| key.starts_with(p)) {
                continue;
            }
            if last_prefix.as_deref().is_some_and(|p| key.starts_with(p)) {
                continue;
            }
            if page.objects.len() + page.common_prefix_count == self.page_size {
                page.next_continuation_token = last_entry;
                return Ok(page);
            }

            let rest = &key[query.prefix.len()..];
            if query.has_delimiter() {
                if let Some(idx) = rest.find(query.delimiter.as_str()) {
                    let common = format!(
                        "{}{}",
                        query.prefix,
                        &rest[..idx + query.delimiter.len()]
                    );
                    page.common_prefix_count += 1;
                    last_entry = Some(common.clone());
                    last_prefix = Some(common);
                    continue;
                }
            }

            page.objects.push(ObjectRecord::new(object.size, object.last_modified));
            last_entry = Some(key.clone());
        }

        Ok(page)
    }
}

#[async_trait]
impl ObjectLister for MemoryStore {
    async fn list_page(&self, query: &ListingQuery) -> Result<ListPage> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if self.fail_on_call == Some(call) {
            return Err(StoreError::Request(format!(
                "injected failure on call {}",
                call
            )));
        }

        self.list(query)
    }
}

#[async_trait]
impl BucketLister for MemoryStore {
    async fn list_buckets(&self) -> Result<Vec<String>> {
        Ok(self.buckets.read().keys().cloned().collect())
    }
}
