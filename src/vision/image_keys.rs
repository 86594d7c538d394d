// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Object keys the label detection service can read

use std::fmt;

/// Suffixes accepted by the label detection service (JPEG and PNG only)
pub const SUPPORTED_EXTENSIONS: [&str; 3] = [".jpg", ".jpeg", ".png"];

/// Returns true when the lowercased key ends with a supported image suffix
///
/// # Example
/// ```ignore
/// assert!(is_supported_image_key("Photo.JPG"));
/// assert!(!is_supported_image_key("readme.txt"));
/// ```
pub fn is_supported_image_key(key: &str) -> bool {
    let lowered = key.to_lowercase();
    SUPPORTED_EXTENSIONS
        .iter()
        .any(|extension| lowered.ends_with(extension))
}

/// Key of a stored object that passed the image suffix filter
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageKey(String);

impl ImageKey {
    /// Wraps `key` if it names a supported image, keeping the original casing
    pub fn parse(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        if is_supported_image_key(&key) {
            Some(Self(key))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ImageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<&str> for ImageKey {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
