//! SPDX 2.3 JSON format handler

use crate::errors::ConverterError;
use crate::models_spdx::SpdxDocument;
use serde_json::Value;

/// Parse SPDX from an already decoded JSON value
pub fn from_value(value: Value) -> Result<SpdxDocument, ConverterError> {
    serde_json::from_value(value)
        .map_err(|e| ConverterError::ParseError(format!("Failed to parse SPDX JSON: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_minimal_spdx() {
        let doc = from_value(json!({
            "SPDXID": "SPDXRef-DOCUMENT",
            "spdxVersion": "SPDX-2.3",
            "name": "Test Document",
            "creationInfo": {
                "created": "2024-01-01T00:00:00Z",
                "creators": ["Tool: syft-1.0.0"]
            },
            "packages": [ { "SPDXID": "SPDXRef-Package-a", "name": "a" } ]
        }))
        .unwrap();

        assert_eq!(doc.spdx_version, "SPDX-2.3");
        assert_eq!(doc.packages.len(), 1);
        assert_eq!(doc.packages[0].name, "a");
    }

    #[test]
    fn test_parse_rejects_wrong_types() {
        assert!(from_value(json!({ "packages": {} })).is_err());
    }
}
