//! # S3 Exporter Core
//!
//! Enumeration and aggregation engine for the S3 exporter.
//!
//! This crate provides:
//! - **Probe targets**: validated bucket/prefix/delimiter combinations and
//!   the listing mode they select
//! - **Pagination**: a continuation-token walk over any `ObjectLister`
//! - **Aggregation**: object count, size sum, biggest object, most recent
//!   object and common prefix count, folded page by page
//! - **Emission**: the fixed metric descriptor table and per-scrape samples
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │        HTTP probe (s3-exporter-cli)     │
//! ├─────────────────────────────────────────┤
//! │   Scraper  ──►  ScrapeOutcome::samples  │
//! ├─────────────────────────────────────────┤
//! │   Paginator  ──►  AggregateState        │
//! ├─────────────────────────────────────────┤
//! │     ObjectLister (s3-exporter-store)    │
//! └─────────────────────────────────────────┘
//! ```
//!
//! Every scrape starts from an empty aggregate; nothing is kept between
//! scrapes.

pub mod aggregate;
pub mod error;
pub mod metrics;
pub mod paginate;
pub mod scrape;
pub mod target;

pub use aggregate::AggregateState;
pub use error::{CoreError, Result};
pub use metrics::{descriptors, descriptors_for, MetricDesc, MetricScope, Sample, NAMESPACE};
pub use paginate::Paginator;
pub use scrape::{enumerate, ScrapeOutcome, Scraper};
pub use target::{ListingMode, ProbeTarget};
