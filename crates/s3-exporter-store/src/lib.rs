//! # S3 Exporter Store
//!
//! Object store access for the S3 exporter.
//!
//! This crate provides:
//! - **Listing capability**: `ObjectLister` lists one page of objects at a time
//! - **Bucket discovery**: `BucketLister` enumerates reachable buckets
//! - **S3 backend**: `S3Store`, built on the AWS SDK
//! - **Memory backend**: `MemoryStore`, an in-process store for tests
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          Pagination / Discovery         │
//! ├─────────────────────────────────────────┤
//! │     ObjectLister  /  BucketLister       │
//! ├────────────────────┬────────────────────┤
//! │      S3Store       │    MemoryStore     │
//! ├────────────────────┴────────────────────┤
//! │     S3 / S3-compatible endpoint         │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use s3_exporter_store::{ListingQuery, ObjectLister, S3Config, S3Store};
//!
//! let store = S3Store::new(&S3Config::default()).await?;
//! let page = store.list_page(&ListingQuery::new("my-bucket")).await?;
//! println!("{} objects, more: {}", page.objects.len(), page.has_next());
//! ```

pub mod error;
pub mod memory;
pub mod s3;
pub mod types;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use s3::{S3Config, S3Store};
pub use types::{ListPage, ListingQuery, ObjectRecord};

use async_trait::async_trait;

/// Capability to list one page of objects
#[async_trait]
pub trait ObjectLister: Send + Sync {
    /// List the page selected by `query.continuation_token`
    async fn list_page(&self, query: &ListingQuery) -> Result<ListPage>;
}

/// Capability to enumerate bucket names
#[async_trait]
pub trait BucketLister: Send + Sync {
    /// List every bucket visible to the current credentials.
    ///
    /// Names the store reports as unset come back as empty strings.
    async fn list_buckets(&self) -> Result<Vec<String>>;
}
