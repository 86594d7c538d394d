// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod cli;
pub mod config;
pub mod scan;
pub mod storage;
pub mod vision;

pub use config::{ScanConfig, ServiceConfig};
pub use scan::{LabelScanner, RunSummary, ScanOutcome};
pub use storage::{MockS3Backend, ObjectStorage, StorageError};
pub use vision::{ImageKey, LabelDetector, LabelError, LabelResult, MockLabelBackend};
