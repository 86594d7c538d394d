// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Bucket scan: list the images of a bucket, label each one, summarize
//!
//! Every remote call is awaited before the next one starts. A failed
//! listing or a failed image never aborts the scan; only a failure to write
//! the report does.

pub mod labeler;
pub mod lister;
pub mod summary;

use anyhow::Result;
use std::io::Write;
use tracing::info;

use crate::config::ScanConfig;
use crate::storage::ObjectStorage;
use crate::vision::LabelDetector;

pub use labeler::{label_image, render_labels, LabelOutcome};
pub use lister::{list_images, try_list_images};
pub use summary::RunSummary;

/// Horizontal rule between report sections
pub const RULE: &str = "============================================================";

/// How a scan ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Nothing to label; no summary was printed
    NoImages,
    Completed(RunSummary),
}

pub struct LabelScanner<'a> {
    storage: &'a dyn ObjectStorage,
    detector: &'a dyn LabelDetector,
    config: ScanConfig,
}

impl<'a> LabelScanner<'a> {
    pub fn new(
        storage: &'a dyn ObjectStorage,
        detector: &'a dyn LabelDetector,
        config: ScanConfig,
    ) -> Self {
        Self {
            storage,
            detector,
            config,
        }
    }

    /// Runs the whole scan, writing the report to `out`
    pub async fn run<W: Write + ?Sized>(&self, out: &mut W) -> Result<ScanOutcome> {
        let bucket = self.config.bucket.as_str();
        info!("Starting label scan of bucket {}", bucket);

        writeln!(out, "Fetching images from bucket: {}", bucket)?;
        let images = list_images(self.storage, bucket, out).await?;

        if images.is_empty() {
            writeln!(out, "No images found in the bucket.")?;
            return Ok(ScanOutcome::NoImages);
        }

        let names: Vec<&str> = images.iter().map(|key| key.as_str()).collect();
        writeln!(out, "Found {} image(s) in the bucket", images.len())?;
        writeln!(out, "Files: {}", names.join(", "))?;
        writeln!(out, "{}", RULE)?;

        let mut summary = RunSummary::new(images.len());
        for key in &images {
            writeln!(out, "\n{}", RULE)?;
            let outcome = label_image(self.detector, bucket, key, out).await?;

            match &outcome {
                Ok(count) => writeln!(out, "✓ Labels detected in {}: {}", key, count)?,
                Err(_) => writeln!(out, "✗ Failed to process {}", key)?,
            }
            summary.record(&outcome);
            writeln!(out, "{}", RULE)?;
        }

        summary.render(out)?;
        info!(
            "Label scan finished: {} succeeded, {} failed, {} labels",
            summary.successful, summary.failed, summary.total_labels
        );

        Ok(ScanOutcome::Completed(summary))
    }
}
