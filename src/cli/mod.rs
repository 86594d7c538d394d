// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::config::{ScanConfig, ServiceConfig};
use crate::scan::{LabelScanner, ScanOutcome};
use crate::storage::S3Client;
use crate::vision::RekognitionClient;

/// Label the images stored in a bucket
#[derive(Parser, Debug)]
#[command(name = "bucket-labeler")]
#[command(version)]
#[command(about = "Detect labels in every image of an S3 bucket", long_about = None)]
pub struct Cli {
    /// TOML file with a [service] table (endpoint override, log filter)
    #[arg(long, env = "BUCKET_LABELER_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// File settings first, then environment overrides
    pub fn service_config(&self) -> Result<ServiceConfig> {
        let config = match &self.config {
            Some(path) => ServiceConfig::from_file(path)
                .with_context(|| format!("Loading {}", path.display()))?,
            None => ServiceConfig::default(),
        };
        let config = config.with_env_overrides();
        config.validate()?;
        Ok(config)
    }
}

/// Execute a scan against the real services
pub async fn execute(service: ServiceConfig, scan: ScanConfig) -> Result<ScanOutcome> {
    if let Some(url) = &service.endpoint_url {
        info!("Using endpoint override {}", url);
    }

    let storage = S3Client::create(service.storage_config(&scan)).await?;
    let detector = RekognitionClient::create(service.labeler_config(&scan)).await?;

    let scanner = LabelScanner::new(storage.as_ref(), detector.as_ref(), scan);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let outcome = scanner.run(&mut out).await?;

    if let ScanOutcome::Completed(summary) = &outcome {
        if summary.failed > 0 {
            warn!("{} image(s) could not be labeled", summary.failed);
        }
    }

    Ok(outcome)
}
