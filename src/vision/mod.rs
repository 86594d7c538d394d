// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image label detection
//!
//! This module provides:
//! - Filtering of bucket keys to images the detection service accepts
//! - The label result model shared by every detection backend
//! - Detection backends (Rekognition and an in-memory mock)

pub mod image_keys;
pub mod label_client;
pub mod labels;

pub use image_keys::{is_supported_image_key, ImageKey, SUPPORTED_EXTENSIONS};
pub use label_client::{
    DetectCall, LabelBackend, LabelDetector, LabelError, LabelerConfig, MockLabelBackend,
    RekognitionBackend, RekognitionClient, MAX_LABELS,
};
pub use labels::{BoundingBox, DetectLabelsResponse, Instance, LabelResult};
