// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::io::{self, Write};
use tracing::{info, warn};

use crate::storage::{ObjectStorage, StorageError};
use crate::vision::ImageKey;

/// Lists one page of `bucket` and keeps the image keys, in listing order.
///
/// `Ok(None)` means the service reported no contents at all.
pub async fn try_list_images(
    storage: &dyn ObjectStorage,
    bucket: &str,
) -> Result<Option<Vec<ImageKey>>, StorageError> {
    let listing = storage.list_objects(bucket).await?;

    if listing.is_truncated {
        warn!(
            "Listing of bucket {} was truncated, only the first page is scanned",
            bucket
        );
    }

    let total_size = listing.total_size();
    let Some(contents) = listing.contents else {
        return Ok(None);
    };

    let listed = contents.len();
    let images: Vec<ImageKey> = contents
        .into_iter()
        .filter_map(|object| ImageKey::parse(object.key))
        .collect();
    info!(
        "Bucket {} listed {} object(s) totalling {} bytes, {} image(s)",
        bucket,
        listed,
        total_size,
        images.len()
    );

    Ok(Some(images))
}

/// Lists the image keys of `bucket`, reporting problems to `out` instead of failing.
///
/// An empty result covers both an empty bucket and a failed listing; the
/// printed message is what tells them apart.
pub async fn list_images<W: Write + ?Sized>(
    storage: &dyn ObjectStorage,
    bucket: &str,
    out: &mut W,
) -> io::Result<Vec<ImageKey>> {
    match try_list_images(storage, bucket).await {
        Ok(Some(images)) => Ok(images),
        Ok(None) => {
            writeln!(out, "No objects found in bucket: {}", bucket)?;
            Ok(Vec::new())
        }
        Err(e) => {
            warn!("Listing bucket {} failed: {}", bucket, e);
            writeln!(out, "Error listing bucket contents: {}", e)?;
            Ok(Vec::new())
        }
    }
}
