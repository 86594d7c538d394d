// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Label detection result types
//!
//! Field names serialize in the service's PascalCase JSON shape so a
//! recorded `DetectLabels` response can be loaded directly.

use serde::{Deserialize, Serialize};

/// Region of an image, each field a fraction of the image dimensions
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BoundingBox {
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
}

/// One located occurrence of a label
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Instance {
    pub bounding_box: BoundingBox,
    pub confidence: f32,
}

/// One detected label
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LabelResult {
    pub name: String,
    /// 0-100
    pub confidence: f32,
    #[serde(default)]
    pub instances: Vec<Instance>,
    #[serde(default, with = "parent_names")]
    pub parents: Vec<String>,
}

/// Body of a label detection response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DetectLabelsResponse {
    #[serde(default)]
    pub labels: Vec<LabelResult>,
}

// Parents arrive as `[{"Name": "..."}]`
mod parent_names {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    struct Parent {
        name: String,
    }

    pub fn serialize<S: Serializer>(names: &[String], serializer: S) -> Result<S::Ok, S::Error> {
        let parents: Vec<Parent> = names
            .iter()
            .map(|name| Parent { name: name.clone() })
            .collect();
        parents.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<String>, D::Error> {
        let parents = Vec::<Parent>::deserialize(deserializer)?;
        Ok(parents.into_iter().map(|parent| parent.name).collect())
    }
}
