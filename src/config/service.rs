// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::storage::{StorageBackend, StorageConfig};
use crate::vision::{LabelBackend, LabelerConfig};

use super::scan::ScanConfig;

pub const ENDPOINT_URL_ENV: &str = "BUCKET_LABELER_ENDPOINT_URL";
pub const LOG_FILTER_ENV: &str = "BUCKET_LABELER_LOG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    Io(String, std::io::Error),
    #[error("Failed to parse config file {0}: {1}")]
    Parse(String, toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Connection settings for the remote services
///
/// Bucket and region are not part of this; they live in `ScanConfig`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Overrides the service endpoint, e.g. a local S3-compatible stack
    pub endpoint_url: Option<String>,
    /// Filter used when RUST_LOG is unset
    pub log_filter: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint_url: None,
            log_filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    service: ServiceConfig,
}

impl ServiceConfig {
    /// Load the `[service]` table from a TOML file; a missing table yields defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(display.clone(), e))?;
        let file: ConfigFile =
            toml::from_str(&content).map_err(|e| ConfigError::Parse(display, e))?;
        file.service.validate()?;
        Ok(file.service)
    }

    /// Overlay `BUCKET_LABELER_ENDPOINT_URL` and `BUCKET_LABELER_LOG`; blank values are ignored
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(ENDPOINT_URL_ENV) {
            if !url.trim().is_empty() {
                self.endpoint_url = Some(url);
            }
        }

        if let Ok(filter) = std::env::var(LOG_FILTER_ENV) {
            if !filter.trim().is_empty() {
                self.log_filter = filter;
            }
        }

        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.endpoint_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Invalid(format!(
                    "endpoint_url must start with http:// or https://, got {}",
                    url
                )));
            }
        }
        if self.log_filter.trim().is_empty() {
            return Err(ConfigError::Invalid("log_filter must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn storage_config(&self, scan: &ScanConfig) -> StorageConfig {
        StorageConfig {
            backend: StorageBackend::Aws {
                region: scan.region.clone(),
                endpoint_url: self.endpoint_url.clone(),
            },
        }
    }

    pub fn labeler_config(&self, scan: &ScanConfig) -> LabelerConfig {
        LabelerConfig {
            backend: LabelBackend::Aws {
                region: scan.region.clone(),
                endpoint_url: self.endpoint_url.clone(),
            },
        }
    }
}
