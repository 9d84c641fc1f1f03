//! AWS S3 backend

use crate::{BucketLister, ListPage, ListingQuery, ObjectLister, ObjectRecord, Result, StoreError};
use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::Client;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// S3 client configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct S3Config {
    /// Custom endpoint URL (MinIO, LocalStack, ...)
    pub endpoint_url: Option<String>,
    /// Use plain HTTP for scheme-less endpoint URLs
    pub disable_ssl: bool,
    /// Address buckets as `endpoint/bucket` instead of `bucket.endpoint`
    pub force_path_style: bool,
    /// AWS region, falls back to the SDK provider chain
    pub region: Option<String>,
    /// Static access key id, falls back to the SDK provider chain
    pub access_key_id: Option<String>,
    /// Static secret access key
    pub secret_access_key: Option<String>,
    /// Session token for temporary credentials
    pub session_token: Option<String>,
    /// Transport-level attempts per request, including the first
    pub max_attempts: u32,
    /// Timeout for a single API operation, retries included
    pub operation_timeout: Option<Duration>,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            endpoint_url: None,
            disable_ssl: false,
            force_path_style: false,
            region: None,
            access_key_id: None,
            secret_access_key: None,
            session_token: None,
            max_attempts: 3,
            operation_timeout: None,
        }
    }
}

impl S3Config {
    /// Set a custom endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint.into());
        self
    }

    /// Set the AWS region
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set static credentials
    pub fn with_credentials(
        mut self,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        self.access_key_id = Some(access_key_id.into());
        self.secret_access_key = Some(secret_access_key.into());
        self
    }

    /// Use path-style addressing
    pub fn with_path_style(mut self) -> Self {
        self.force_path_style = true;
        self
    }

    /// Endpoint URL with a scheme, if an endpoint is configured.
    ///
    /// Scheme-less endpoints get `http://` when SSL is disabled and
    /// `https://` otherwise. Explicit schemes are kept as given.
    pub fn resolved_endpoint(&self) -> Option<String> {
        let url = self.endpoint_url.as_deref()?.trim();
        if url.is_empty() {
            return None;
        }
        if url.contains("://") {
            return Some(url.to_string());
        }
        let scheme = if self.disable_ssl { "http" } else { "https" };
        Some(format!("{}://{}", scheme, url))
    }
}

/// Object store backed by the AWS S3 API
#[derive(Clone, Debug)]
pub struct S3Store {
    client: Client,
}

impl S3Store {
    /// Build a client from configuration and the SDK's default provider chain
    pub async fn new(config: &S3Config) -> Result<Self> {
        if config.max_attempts == 0 {
            return Err(StoreError::Config("max_attempts must be at least 1".into()));
        }

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .retry_config(RetryConfig::standard().with_max_attempts(config.max_attempts));

        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }

        if let Some(endpoint) = config.resolved_endpoint() {
            loader = loader.endpoint_url(endpoint);
        }

        if let Some(timeout) = config.operation_timeout {
            loader = loader.timeout_config(
                TimeoutConfig::builder().operation_timeout(timeout).build(),
            );
        }

        match (&config.access_key_id, &config.secret_access_key) {
            (Some(access_key), Some(secret_key)) => {
                let credentials = aws_sdk_s3::config::Credentials::new(
                    access_key,
                    secret_key,
                    config.session_token.clone(),
                    None,
                    "s3-exporter",
                );
                loader = loader.credentials_provider(credentials);
            }
            (None, None) => {}
            _ => {
                return Err(StoreError::Config(
                    "access key id and secret access key must be set together".into(),
                ))
            }
        }

        let sdk_config = loader.load().await;
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.force_path_style)
            .build();

        Ok(Self::from_client(Client::from_conf(s3_config)))
    }

    /// Wrap an existing SDK client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectLister for S3Store {
    #[instrument(skip(self), fields(bucket = %query.bucket, prefix = %query.prefix))]
    async fn list_page(&self, query: &ListingQuery) -> Result<ListPage> {
        let mut req = self.client.list_objects_v2().bucket(&query.bucket);

        if !query.prefix.is_empty() {
            req = req.prefix(&query.prefix);
        }
        if query.has_delimiter() {
            req = req.delimiter(&query.delimiter);
        }
        if let Some(token) = &query.continuation_token {
            req = req.continuation_token(token);
        }

        let resp = req.send().await.map_err(|e| {
            let err = e.into_service_error();
            if err.is_no_such_bucket() {
                StoreError::NoSuchBucket(query.bucket.clone())
            } else {
                StoreError::Request(format!(
                    "ListObjectsV2 on {} failed: {}",
                    query.bucket,
                    DisplayErrorContext(&err)
                ))
            }
        })?;

        let objects: Vec<ObjectRecord> = resp
            .contents()
            .iter()
            .map(|obj| ObjectRecord {
                size: obj.size().and_then(|s| u64::try_from(s).ok()).unwrap_or(0),
                last_modified: obj
                    .last_modified()
                    .and_then(|t| DateTime::<Utc>::from_timestamp(t.secs(), t.subsec_nanos())),
            })
            .collect();

        let next_continuation_token = resp
            .next_continuation_token()
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        debug!(
            objects = objects.len(),
            common_prefixes = resp.common_prefixes().len(),
            truncated = next_continuation_token.is_some(),
            "Listed page"
        );

        Ok(ListPage {
            objects,
            common_prefix_count: resp.common_prefixes().len(),
            next_continuation_token,
        })
    }
}

#[async_trait]
impl BucketLister for S3Store {
    #[instrument(skip(self))]
    async fn list_buckets(&self) -> Result<Vec<String>> {
        let resp = self.client.list_buckets().send().await.map_err(|e| {
            StoreError::Request(format!("ListBuckets failed: {}", DisplayErrorContext(&e)))
        })?;

        Ok(resp
            .buckets()
            .iter()
            .map(|b| b.name().unwrap_or_default().to_string())
            .collect())
    }
}
