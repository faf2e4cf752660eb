//! CycloneDX data structures.
//!
//! The same types are used for the BOMs we build from SPDX and for
//! CycloneDX documents we read from disk. We only model the fields the
//! crate actually touches; everything else is kept in flattened `extra`
//! maps so that a read-then-write cycle does not drop data.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const BOM_FORMAT: &str = "CycloneDX";
pub const COMPONENT_TYPE_LIBRARY: &str = "library";
pub const EXTERNAL_REF_WEBSITE: &str = "website";
pub const EXTERNAL_REF_DISTRIBUTION: &str = "distribution";

/// Top-level BOM structure.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CdxBom {
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default)]
    pub bom_format: String,
    #[serde(default)]
    pub spec_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<CdxMetadata>,
    #[serde(default)]
    pub components: Vec<CdxComponent>,
    #[serde(default)]
    pub dependencies: Vec<CdxDependency>,
    // services, vulnerabilities, compositions, ...
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CdxMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<CdxTools>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<Box<CdxComponent>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `metadata.tools` is a plain list up to CycloneDX 1.4 and an object of
/// `components`/`services` from 1.5 on. Both shapes are accepted.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum CdxTools {
    List(Vec<CdxTool>),
    Structured(CdxToolsObject),
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct CdxToolsObject {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<CdxComponent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct CdxTool {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A CycloneDX component.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CdxComponent {
    #[serde(rename = "bom-ref", skip_serializing_if = "Option::is_none")]
    pub bom_ref: Option<String>,
    #[serde(rename = "type", default)]
    pub component_type: String, // "library", "application", "file", ...
    #[serde(default)]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hashes: Option<Vec<CdxHash>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub licenses: Option<Vec<CdxLicenseChoice>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_references: Option<Vec<CdxExternalReference>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<CdxScope>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<CdxProperty>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<CdxComponent>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Whether a component is needed at runtime.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CdxScope {
    Required,
    Optional,
    Excluded,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct CdxHash {
    pub alg: CdxHashAlgorithm,
    pub content: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CdxHashAlgorithm {
    #[serde(rename = "MD5")]
    Md5,
    #[serde(rename = "SHA-1")]
    Sha1,
    #[serde(rename = "SHA-256")]
    Sha256,
    #[serde(rename = "SHA-384")]
    Sha384,
    #[serde(rename = "SHA-512")]
    Sha512,
    #[serde(rename = "SHA3-256")]
    Sha3_256,
    #[serde(rename = "SHA3-384")]
    Sha3_384,
    #[serde(rename = "SHA3-512")]
    Sha3_512,
    #[serde(rename = "BLAKE2b-256")]
    Blake2b256,
    #[serde(rename = "BLAKE2b-384")]
    Blake2b384,
    #[serde(rename = "BLAKE2b-512")]
    Blake2b512,
    #[serde(rename = "BLAKE3")]
    Blake3,
}

/// One entry of a `licenses` array: either a single license or an SPDX
/// expression, never both.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum CdxLicenseChoice {
    License {
        license: CdxLicense,
    },
    Expression {
        expression: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        acknowledgement: Option<LicenseAcknowledgement>,
        // bom-ref, ...
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct CdxLicense {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acknowledgement: Option<LicenseAcknowledgement>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LicenseAcknowledgement {
    Declared,
    Concluded,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct CdxExternalReference {
    #[serde(rename = "type")]
    pub ref_type: String, // "website", "distribution", "vcs", ...
    pub url: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CdxExternalReference {
    pub fn new(ref_type: &str, url: impl Into<String>) -> Self {
        Self {
            ref_type: ref_type.to_string(),
            url: url.into(),
            extra: Map::new(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct CdxProperty {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A CycloneDX dependency graph entry.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CdxDependency {
    #[serde(rename = "ref")]
    pub dep_ref: String,
    #[serde(default)]
    pub depends_on: Vec<String>,
    // provides (1.6)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_unknown_fields_survive_a_round_trip() {
        let input = json!({
            "bomFormat": "CycloneDX",
            "specVersion": "1.4",
            "version": 1,
            "components": [
                {
                    "type": "library",
                    "name": "log4j-core",
                    "cpe": "cpe:2.3:a:apache:log4j:2.14.1:*:*:*:*:*:*:*",
                    "supplier": { "name": "Apache" }
                }
            ],
            "vulnerabilities": [ { "id": "CVE-2021-44228" } ]
        });

        let bom: CdxBom = serde_json::from_value(input).unwrap();
        assert_eq!(bom.components[0].extra["supplier"]["name"], "Apache");

        let output = serde_json::to_value(&bom).unwrap();
        assert_eq!(output["vulnerabilities"][0]["id"], "CVE-2021-44228");
        assert_eq!(
            output["components"][0]["cpe"],
            "cpe:2.3:a:apache:log4j:2.14.1:*:*:*:*:*:*:*"
        );
    }

    #[test]
    fn test_dependency_and_expression_fields_survive_a_round_trip() {
        let input = json!({
            "bomFormat": "CycloneDX",
            "specVersion": "1.6",
            "version": 1,
            "metadata": {
                "tools": { "components": [], "services": [], "note": "kept" }
            },
            "components": [
                {
                    "type": "library",
                    "name": "a",
                    "licenses": [ { "expression": "MIT OR Apache-2.0", "bom-ref": "lic-1" } ],
                    "properties": [ { "name": "p", "value": "v", "x-origin": "scanner" } ]
                }
            ],
            "dependencies": [ { "ref": "a", "dependsOn": [], "provides": ["crypto-x"] } ]
        });

        let bom: CdxBom = serde_json::from_value(input).unwrap();
        let output = serde_json::to_value(&bom).unwrap();

        assert_eq!(output["dependencies"][0]["provides"], json!(["crypto-x"]));
        assert_eq!(
            output["components"][0]["licenses"],
            json!([ { "expression": "MIT OR Apache-2.0", "bom-ref": "lic-1" } ])
        );
        assert_eq!(output["components"][0]["properties"][0]["x-origin"], "scanner");
        assert_eq!(output["metadata"]["tools"]["note"], "kept");
    }

    #[test]
    fn test_license_choice_shapes() {
        let licenses: Vec<CdxLicenseChoice> = serde_json::from_value(json!([
            { "license": { "id": "MIT" } },
            { "expression": "MIT OR Apache-2.0" }
        ]))
        .unwrap();

        assert!(matches!(
            &licenses[0],
            CdxLicenseChoice::License { license } if license.id.as_deref() == Some("MIT")
        ));
        assert!(matches!(
            &licenses[1],
            CdxLicenseChoice::Expression { expression, .. } if expression == "MIT OR Apache-2.0"
        ));
    }

    #[test]
    fn test_tools_accepts_legacy_and_structured_forms() {
        let legacy: CdxMetadata = serde_json::from_value(json!({
            "tools": [ { "vendor": "@cyclonedx", "name": "cyclonedx-library", "version": "1.9.2" } ]
        }))
        .unwrap();
        assert!(matches!(legacy.tools, Some(CdxTools::List(ref t)) if t[0].vendor.as_deref() == Some("@cyclonedx")));

        let structured: CdxMetadata = serde_json::from_value(json!({
            "tools": { "components": [ { "type": "application", "name": "syft" } ] }
        }))
        .unwrap();
        assert!(matches!(structured.tools, Some(CdxTools::Structured(ref t)) if t.components[0].name == "syft"));
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(serde_json::to_value(CdxScope::Excluded).unwrap(), json!("excluded"));
        assert_eq!(
            serde_json::to_value(CdxHashAlgorithm::Blake2b256).unwrap(),
            json!("BLAKE2b-256")
        );
        assert_eq!(
            serde_json::to_value(CdxHashAlgorithm::Sha3_384).unwrap(),
            json!("SHA3-384")
        );
    }

    #[test]
    fn test_dependency_without_depends_on() {
        let dep: CdxDependency = serde_json::from_value(json!({ "ref": "a@1" })).unwrap();
        assert!(dep.depends_on.is_empty());
        assert_eq!(
            serde_json::to_value(&dep).unwrap(),
            json!({ "ref": "a@1", "dependsOn": [] })
        );
    }
}
