// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod s3_client;

// Re-export main types for convenience
pub use s3_client::{
    MockS3Backend, ObjectListing, ObjectStorage, RealS3Backend, S3Client, StorageBackend,
    StorageConfig, StorageError, StoredObject,
};
