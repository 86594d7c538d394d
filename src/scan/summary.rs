// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::io::{self, Write};

use super::labeler::LabelOutcome;
use super::RULE;

/// Counters accumulated over one scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub images_found: usize,
    pub successful: usize,
    pub failed: usize,
    pub total_labels: usize,
}

impl RunSummary {
    pub fn new(images_found: usize) -> Self {
        Self {
            images_found,
            ..Self::default()
        }
    }

    /// Records the outcome of one image. `Ok(0)` counts as a success.
    pub fn record(&mut self, outcome: &LabelOutcome) {
        match outcome {
            Ok(count) => {
                self.successful += 1;
                self.total_labels += count;
            }
            Err(_) => self.failed += 1,
        }
    }

    pub fn processed(&self) -> usize {
        self.successful + self.failed
    }

    pub fn render<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "\n\n{}", RULE)?;
        writeln!(out, "SUMMARY")?;
        writeln!(out, "{}", RULE)?;
        writeln!(out, "Total images found: {}", self.images_found)?;
        writeln!(out, "Successfully processed: {}", self.successful)?;
        writeln!(out, "Failed: {}", self.failed)?;
        writeln!(out, "Total labels detected: {}", self.total_labels)?;
        Ok(())
    }
}
