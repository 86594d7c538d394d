// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
/// Bucket scanned when no other configuration is supplied
pub const DEFAULT_BUCKET: &str = "project-rekognition-s3";
/// Region both services are reached in
pub const DEFAULT_REGION: &str = "us-east-1";

/// What a scan runs against
#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig {
    pub bucket: String,
    pub region: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            bucket: DEFAULT_BUCKET.to_string(),
            region: DEFAULT_REGION.to_string(),
        }
    }
}

impl ScanConfig {
    /// Config for an arbitrary bucket, used when wiring mock backends
    pub fn for_bucket(bucket: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            ..Self::default()
        }
    }
}
