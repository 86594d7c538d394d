// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Bucket not found: {0}")]
    NotFound(String),
    #[error("Authentication error: {0}")]
    AuthError(String),
    #[error("Service error: {0}")]
    ServiceError(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum StorageBackend {
    Mock,
    Aws {
        region: String,
        endpoint_url: Option<String>,
    },
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

/// One object descriptor from a listing page.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub key: String,
    /// Bytes; `None` when the service left it out
    pub size: Option<i64>,
}

/// A single page returned by the storage service.
///
/// `contents` is `None` when the service omitted the contents field,
/// which is how an empty bucket is reported.
#[derive(Debug, Clone, Default)]
pub struct ObjectListing {
    pub contents: Option<Vec<StoredObject>>,
    pub is_truncated: bool,
}

impl ObjectListing {
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.contents
            .iter()
            .flatten()
            .map(|object| object.key.as_str())
    }

    /// Sum of the reported object sizes; objects without a size count as zero
    pub fn total_size(&self) -> i64 {
        self.contents
            .iter()
            .flatten()
            .map(|object| object.size.unwrap_or(0))
            .sum()
    }
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Lists one page of objects in `bucket`. Never follows continuation tokens.
    async fn list_objects(&self, bucket: &str) -> Result<ObjectListing, StorageError>;

    // Mock-specific methods (no-op for real backend)
    async fn inject_error(&self, _error: StorageError) {}
}

#[derive(Debug, Default)]
struct MockBucket {
    objects: Vec<StoredObject>,
    no_contents: bool,
    truncated: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MockS3Backend {
    buckets: Arc<Mutex<Vec<(String, MockBucket)>>>,
    injected_error: Arc<Mutex<Option<StorageError>>>,
    list_calls: Arc<Mutex<usize>>,
}

impl MockS3Backend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds objects to `bucket`, keeping insertion order for listings.
    pub async fn put_keys<I, S>(&self, bucket: &str, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut buckets = self.buckets.lock().await;
        let entry = Self::bucket_entry(&mut buckets, bucket);
        entry.no_contents = false;
        entry.objects.extend(keys.into_iter().map(|key| StoredObject {
            key: key.into(),
            size: None,
        }));
    }

    /// Adds one object with a known size.
    pub async fn put_object(&self, bucket: &str, key: &str, size: i64) {
        let mut buckets = self.buckets.lock().await;
        let entry = Self::bucket_entry(&mut buckets, bucket);
        entry.no_contents = false;
        entry.objects.push(StoredObject {
            key: key.to_string(),
            size: Some(size),
        });
    }

    /// Makes `bucket` answer with no contents field at all.
    pub async fn set_no_contents(&self, bucket: &str) {
        let mut buckets = self.buckets.lock().await;
        let entry = Self::bucket_entry(&mut buckets, bucket);
        entry.objects.clear();
        entry.no_contents = true;
    }

    pub async fn set_truncated(&self, bucket: &str, truncated: bool) {
        let mut buckets = self.buckets.lock().await;
        Self::bucket_entry(&mut buckets, bucket).truncated = truncated;
    }

    pub async fn list_calls(&self) -> usize {
        *self.list_calls.lock().await
    }

    fn bucket_entry<'a>(
        buckets: &'a mut Vec<(String, MockBucket)>,
        bucket: &str,
    ) -> &'a mut MockBucket {
        let index = match buckets.iter().position(|(name, _)| name == bucket) {
            Some(index) => index,
            None => {
                buckets.push((bucket.to_string(), MockBucket::default()));
                buckets.len() - 1
            }
        };
        &mut buckets[index].1
    }

    async fn check_injected_error(&self) -> Result<(), StorageError> {
        let mut error_opt = self.injected_error.lock().await;
        if let Some(error) = error_opt.take() {
            return Err(error);
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStorage for MockS3Backend {
    async fn list_objects(&self, bucket: &str) -> Result<ObjectListing, StorageError> {
        *self.list_calls.lock().await += 1;
        self.check_injected_error().await?;

        let buckets = self.buckets.lock().await;
        let (_, entry) = buckets
            .iter()
            .find(|(name, _)| name == bucket)
            .ok_or_else(|| StorageError::NotFound(bucket.to_string()))?;

        // S3 omits Contents entirely for an empty bucket
        let contents = if entry.no_contents || entry.objects.is_empty() {
            None
        } else {
            Some(entry.objects.clone())
        };

        Ok(ObjectListing {
            contents,
            is_truncated: entry.truncated,
        })
    }

    async fn inject_error(&self, error: StorageError) {
        let mut injected_error = self.injected_error.lock().await;
        *injected_error = Some(error);
    }
}

#[derive(Debug, Clone)]
pub struct RealS3Backend {
    client: aws_sdk_s3::Client,
}

impl RealS3Backend {
    pub async fn new(region: &str, endpoint_url: Option<&str>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .retry_config(RetryConfig::disabled());
        if let Some(url) = endpoint_url {
            loader = loader.endpoint_url(url);
        }
        let sdk_config = loader.load().await;

        // Local S3-compatible endpoints generally need path-style addressing
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(endpoint_url.is_some())
            .build();

        Self {
            client: aws_sdk_s3::Client::from_conf(s3_config),
        }
    }
}

fn map_sdk_error<E, R>(bucket: &str, err: SdkError<E, R>) -> StorageError
where
    E: std::error::Error + ProvideErrorMetadata + 'static,
    R: std::fmt::Debug,
{
    let message = DisplayErrorContext(&err).to_string();
    match &err {
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) => {
            StorageError::NetworkError(message)
        }
        SdkError::ServiceError(context) => match context.err().code() {
            Some("NoSuchBucket") => StorageError::NotFound(bucket.to_string()),
            Some("AccessDenied" | "InvalidAccessKeyId" | "SignatureDoesNotMatch") => {
                StorageError::AuthError(message)
            }
            _ => StorageError::ServiceError(message),
        },
        _ => StorageError::ServiceError(message),
    }
}

#[async_trait]
impl ObjectStorage for RealS3Backend {
    async fn list_objects(&self, bucket: &str) -> Result<ObjectListing, StorageError> {
        tracing::debug!("ListObjectsV2 bucket={}", bucket);

        let output = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| map_sdk_error(bucket, e))?;

        let contents = output.contents.map(|objects| {
            objects
                .into_iter()
                .filter_map(|object| {
                    object.key.map(|key| StoredObject {
                        key,
                        size: object.size,
                    })
                })
                .collect()
        });

        Ok(ObjectListing {
            contents,
            is_truncated: output.is_truncated.unwrap_or(false),
        })
    }
}

pub struct S3Client;

impl S3Client {
    pub async fn create(config: StorageConfig) -> Result<Box<dyn ObjectStorage>, StorageError> {
        match config.backend {
            StorageBackend::Mock => Ok(Box::new(MockS3Backend::new())),
            StorageBackend::Aws {
                region,
                endpoint_url,
            } => {
                if region.trim().is_empty() {
                    return Err(StorageError::ServiceError(
                        "Region must not be empty".to_string(),
                    ));
                }
                Ok(Box::new(
                    RealS3Backend::new(&region, endpoint_url.as_deref()).await,
                ))
            }
        }
    }
}
