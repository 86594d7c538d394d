// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::io::{self, Write};
use tracing::warn;

use crate::vision::{ImageKey, LabelDetector, LabelError, LabelResult, MAX_LABELS};

/// Label count on success, the service fault otherwise
pub type LabelOutcome = Result<usize, LabelError>;

/// Writes the label blocks for one image.
pub fn render_labels<W: Write + ?Sized>(
    key: &ImageKey,
    labels: &[LabelResult],
    out: &mut W,
) -> io::Result<()> {
    writeln!(out, "Detected labels for {}", key)?;
    writeln!(out)?;

    for label in labels {
        writeln!(out, "Label: {}", label.name)?;
        writeln!(out, "Confidence: {}", label.confidence)?;
        writeln!(out, "Instances:")?;
        for instance in &label.instances {
            let bbox = &instance.bounding_box;
            writeln!(out, "  Bounding box")?;
            writeln!(out, "    Top: {}", bbox.top)?;
            writeln!(out, "    Left: {}", bbox.left)?;
            writeln!(out, "    Width: {}", bbox.width)?;
            writeln!(out, "    Height: {}", bbox.height)?;
            writeln!(out, "  Confidence: {}", instance.confidence)?;
            writeln!(out)?;
        }

        writeln!(out, "Parents:")?;
        for parent in &label.parents {
            writeln!(out, "   {}", parent)?;
        }
        writeln!(out, "----------")?;
        writeln!(out)?;
    }

    Ok(())
}

/// Detects and prints the labels of one image, requesting at most `MAX_LABELS`.
///
/// The outer `io::Result` only fails when `out` does; a service fault is
/// reported to `out` and returned as the inner `Err`.
pub async fn label_image<W: Write + ?Sized>(
    detector: &dyn LabelDetector,
    bucket: &str,
    key: &ImageKey,
    out: &mut W,
) -> io::Result<LabelOutcome> {
    match detector.detect_labels(bucket, key.as_str(), MAX_LABELS).await {
        Ok(labels) => {
            render_labels(key, &labels, out)?;
            Ok(Ok(labels.len()))
        }
        Err(e) => {
            warn!("Label detection failed for {}: {}", key, e);
            writeln!(out, "ERROR processing {}: {}", key, e)?;
            writeln!(out)?;
            Ok(Err(e))
        }
    }
}
