//! Data structures for SPDX 2.3 JSON documents.
//!
//! These are intentionally lenient: SBOMs from the wild are frequently
//! incomplete, so every collection defaults to empty and every optional
//! scalar is an `Option`. Fields we never read are skipped by serde.

use serde::{Deserialize, Serialize};

/// Sentinel SPDX uses for "no data".
pub const NOASSERTION: &str = "NOASSERTION";

/// Identifier of the document element itself.
pub const DOCUMENT_SPDX_ID: &str = "SPDXRef-DOCUMENT";

/// Top-level SPDX 2.3 document.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SpdxDocument {
    #[serde(rename = "SPDXID", default)]
    pub spdx_id: String,
    #[serde(default)]
    pub spdx_version: String,
    #[serde(default)]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_license: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_info: Option<SpdxCreationInfo>,
    #[serde(default)]
    pub document_describes: Vec<String>,
    #[serde(default)]
    pub packages: Vec<SpdxPackage>,
    #[serde(default)]
    pub relationships: Vec<SpdxRelationship>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SpdxCreationInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>, // ISO 8601
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creators: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_list_version: Option<String>,
}

/// An SPDX package record.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SpdxPackage {
    #[serde(rename = "SPDXID", default)]
    pub spdx_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksums: Option<Vec<SpdxChecksum>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_declared: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_concluded: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_refs: Option<Vec<SpdxExternalRef>>,
}

impl SpdxPackage {
    /// Locator of the first `purl` external reference, if any.
    pub fn purl(&self) -> Option<&str> {
        self.external_refs
            .as_ref()?
            .iter()
            .find(|r| r.reference_type == "purl")
            .map(|r| r.reference_locator.as_str())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SpdxChecksum {
    #[serde(default)]
    pub algorithm: String, // "SHA256", "BLAKE2b-256", ...
    #[serde(default)]
    pub checksum_value: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SpdxExternalRef {
    #[serde(default)]
    pub reference_category: String,
    #[serde(default)]
    pub reference_type: String,
    #[serde(default)]
    pub reference_locator: String,
}

/// A directed SPDX relationship edge.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SpdxRelationship {
    #[serde(default)]
    pub spdx_element_id: String,
    #[serde(default)]
    pub relationship_type: String, // e.g., "DEPENDENCY_OF", "DEV_DEPENDENCY_OF"
    #[serde(default)]
    pub related_spdx_element: String,
}
