// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod scan;
pub mod service;

pub use scan::{ScanConfig, DEFAULT_BUCKET, DEFAULT_REGION};
pub use service::{ConfigError, ServiceConfig, ENDPOINT_URL_ENV, LOG_FILTER_ENV};
