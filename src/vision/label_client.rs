// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Label detection client for images stored in a bucket

use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::BehaviorVersion;
use aws_sdk_rekognition::config::Region;
use aws_sdk_rekognition::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_rekognition::types::{Image, S3Object};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

use super::labels::{BoundingBox, Instance, LabelResult};

/// Upper bound on labels requested per image
pub const MAX_LABELS: i32 = 5;

#[derive(Debug, Clone, Error)]
pub enum LabelError {
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Invalid image: {0}")]
    InvalidImage(String),
    #[error("Authentication error: {0}")]
    AuthError(String),
    #[error("Service error: {0}")]
    ServiceError(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LabelBackend {
    Mock,
    Aws {
        region: String,
        endpoint_url: Option<String>,
    },
}

#[derive(Debug, Clone)]
pub struct LabelerConfig {
    pub backend: LabelBackend,
}

#[async_trait]
pub trait LabelDetector: Send + Sync {
    /// Detects at most `max_labels` labels in the object `key` of `bucket`
    async fn detect_labels(
        &self,
        bucket: &str,
        key: &str,
        max_labels: i32,
    ) -> Result<Vec<LabelResult>, LabelError>;

    // Mock-specific methods (no-op for real backend)
    async fn inject_error(&self, _error: LabelError) {}
}

/// A recorded `detect_labels` call
#[derive(Debug, Clone, PartialEq)]
pub struct DetectCall {
    pub bucket: String,
    pub key: String,
    pub max_labels: i32,
}

#[derive(Debug, Clone, Default)]
pub struct MockLabelBackend {
    responses: Arc<Mutex<HashMap<String, Result<Vec<LabelResult>, LabelError>>>>,
    injected_error: Arc<Mutex<Option<LabelError>>>,
    calls: Arc<Mutex<Vec<DetectCall>>>,
}

impl MockLabelBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_labels(&self, key: &str, labels: Vec<LabelResult>) {
        let mut responses = self.responses.lock().await;
        responses.insert(key.to_string(), Ok(labels));
    }

    pub async fn set_error(&self, key: &str, error: LabelError) {
        let mut responses = self.responses.lock().await;
        responses.insert(key.to_string(), Err(error));
    }

    pub async fn calls(&self) -> Vec<DetectCall> {
        self.calls.lock().await.clone()
    }

    async fn check_injected_error(&self) -> Result<(), LabelError> {
        let mut error_opt = self.injected_error.lock().await;
        if let Some(error) = error_opt.take() {
            return Err(error);
        }
        Ok(())
    }
}

#[async_trait]
impl LabelDetector for MockLabelBackend {
    async fn detect_labels(
        &self,
        bucket: &str,
        key: &str,
        max_labels: i32,
    ) -> Result<Vec<LabelResult>, LabelError> {
        self.calls.lock().await.push(DetectCall {
            bucket: bucket.to_string(),
            key: key.to_string(),
            max_labels,
        });
        self.check_injected_error().await?;

        let responses = self.responses.lock().await;
        match responses.get(key) {
            Some(Ok(labels)) => {
                let cap = usize::try_from(max_labels).unwrap_or(0);
                Ok(labels.iter().take(cap).cloned().collect())
            }
            Some(Err(error)) => Err(error.clone()),
            None => Err(LabelError::InvalidImage(format!(
                "Unable to get object metadata from S3: {}/{}",
                bucket, key
            ))),
        }
    }

    async fn inject_error(&self, error: LabelError) {
        let mut injected_error = self.injected_error.lock().await;
        *injected_error = Some(error);
    }
}

#[derive(Debug, Clone)]
pub struct RekognitionBackend {
    client: aws_sdk_rekognition::Client,
}

impl RekognitionBackend {
    pub async fn new(region: &str, endpoint_url: Option<&str>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .retry_config(RetryConfig::disabled());
        if let Some(url) = endpoint_url {
            loader = loader.endpoint_url(url);
        }
        let sdk_config = loader.load().await;

        Self {
            client: aws_sdk_rekognition::Client::new(&sdk_config),
        }
    }

    fn convert_label(label: aws_sdk_rekognition::types::Label) -> LabelResult {
        let instances = label
            .instances
            .unwrap_or_default()
            .into_iter()
            .map(|instance| {
                let bounding_box = instance
                    .bounding_box
                    .map(|bbox| BoundingBox {
                        top: bbox.top.unwrap_or_default(),
                        left: bbox.left.unwrap_or_default(),
                        width: bbox.width.unwrap_or_default(),
                        height: bbox.height.unwrap_or_default(),
                    })
                    .unwrap_or_default();
                Instance {
                    bounding_box,
                    confidence: instance.confidence.unwrap_or_default(),
                }
            })
            .collect();

        let parents = label
            .parents
            .unwrap_or_default()
            .into_iter()
            .filter_map(|parent| parent.name)
            .collect();

        LabelResult {
            name: label.name.unwrap_or_default(),
            confidence: label.confidence.unwrap_or_default(),
            instances,
            parents,
        }
    }
}

fn map_sdk_error<E, R>(err: SdkError<E, R>) -> LabelError
where
    E: std::error::Error + ProvideErrorMetadata + 'static,
    R: std::fmt::Debug,
{
    let message = DisplayErrorContext(&err).to_string();
    match &err {
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) => {
            LabelError::NetworkError(message)
        }
        SdkError::ServiceError(context) => match context.err().code() {
            Some(
                "InvalidS3ObjectException"
                | "InvalidImageFormatException"
                | "ImageTooLargeException",
            ) => LabelError::InvalidImage(message),
            Some("AccessDeniedException" | "UnrecognizedClientException") => {
                LabelError::AuthError(message)
            }
            _ => LabelError::ServiceError(message),
        },
        _ => LabelError::ServiceError(message),
    }
}

#[async_trait]
impl LabelDetector for RekognitionBackend {
    async fn detect_labels(
        &self,
        bucket: &str,
        key: &str,
        max_labels: i32,
    ) -> Result<Vec<LabelResult>, LabelError> {
        debug!("DetectLabels bucket={} key={} max_labels={}", bucket, key, max_labels);

        let image = Image::builder()
            .s3_object(S3Object::builder().bucket(bucket).name(key).build())
            .build();

        let output = self
            .client
            .detect_labels()
            .image(image)
            .max_labels(max_labels)
            .send()
            .await
            .map_err(map_sdk_error)?;

        Ok(output
            .labels
            .unwrap_or_default()
            .into_iter()
            .map(Self::convert_label)
            .collect())
    }
}

pub struct RekognitionClient;

impl RekognitionClient {
    pub async fn create(config: LabelerConfig) -> Result<Box<dyn LabelDetector>, LabelError> {
        match config.backend {
            LabelBackend::Mock => Ok(Box::new(MockLabelBackend::new())),
            LabelBackend::Aws {
                region,
                endpoint_url,
            } => {
                if region.trim().is_empty() {
                    return Err(LabelError::ServiceError(
                        "Region must not be empty".to_string(),
                    ));
                }
                Ok(Box::new(
                    RekognitionBackend::new(&region, endpoint_url.as_deref()).await,
                ))
            }
        }
    }
}
