//! Version detection for SBOM files
//!
//! Classifies parsed documents as CycloneDX or SPDX and reports the
//! version they declare. The predicates never fail: anything that is not
//! recognisably one of the formats, including malformed JSON text, is
//! simply "not this format".

use crate::models_spdx::DOCUMENT_SPDX_ID;
use serde_json::Value;

/// SBOM format type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SbomFormat {
    CycloneDx(String), // version string
    Spdx(String),      // version string
    Unknown,
}

impl SbomFormat {
    /// Get a human-readable name
    pub fn name(&self) -> &str {
        match self {
            SbomFormat::CycloneDx(_) => "CycloneDX",
            SbomFormat::Spdx(_) => "SPDX",
            SbomFormat::Unknown => "Unknown",
        }
    }

    /// Get the version string
    pub fn version(&self) -> Option<&str> {
        match self {
            SbomFormat::CycloneDx(v) | SbomFormat::Spdx(v) => Some(v.as_str()),
            SbomFormat::Unknown => None,
        }
    }
}

/// Detect the SBOM format and version from JSON content
pub fn detect_format(value: &Value) -> SbomFormat {
    if is_cdx_bom(value) {
        let version = value
            .get("specVersion")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        return SbomFormat::CycloneDx(version.to_string());
    }

    if is_spdx_bom(value) {
        let version = value
            .get("spdxVersion")
            .and_then(Value::as_str)
            .and_then(|v| v.strip_prefix("SPDX-"))
            .unwrap_or_default();
        return SbomFormat::Spdx(version.to_string());
    }

    SbomFormat::Unknown
}

/// `bomFormat == "CycloneDX"` and a `components` field.
pub fn is_cdx_bom(value: &Value) -> bool {
    let Some(bom) = value.as_object() else {
        return false;
    };
    bom.contains_key("components")
        && bom.get("bomFormat").and_then(Value::as_str) == Some("CycloneDX")
}

/// `SPDXID == "SPDXRef-DOCUMENT"` and an `spdxVersion` starting with `SPDX-`.
pub fn is_spdx_bom(value: &Value) -> bool {
    let Some(bom) = value.as_object() else {
        return false;
    };
    bom.get("SPDXID").and_then(Value::as_str) == Some(DOCUMENT_SPDX_ID)
        && bom
            .get("spdxVersion")
            .and_then(Value::as_str)
            .is_some_and(|v| v.starts_with("SPDX-"))
}

pub fn is_supported_bom(value: &Value) -> bool {
    is_cdx_bom(value) || is_spdx_bom(value)
}

/// Like [`is_cdx_bom`], for raw JSON text.
pub fn is_cdx_bom_str(content: &str) -> bool {
    parse_json(content).is_some_and(|v| is_cdx_bom(&v))
}

/// Like [`is_spdx_bom`], for raw JSON text.
pub fn is_spdx_bom_str(content: &str) -> bool {
    parse_json(content).is_some_and(|v| is_spdx_bom(&v))
}

/// Like [`is_supported_bom`], for raw JSON text.
pub fn is_supported_bom_str(content: &str) -> bool {
    parse_json(content).is_some_and(|v| is_supported_bom(&v))
}

fn parse_json(content: &str) -> Option<Value> {
    serde_json::from_str(content).ok()
}

/// Get a description of the detected format
pub fn format_description(format: &SbomFormat) -> String {
    match format.version() {
        Some(version) => format!("{} {}", format.name(), version),
        None => format!("{} format", format.name()),
    }
}
