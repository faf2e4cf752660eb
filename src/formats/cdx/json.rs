//! CycloneDX JSON format handler

use crate::errors::ConverterError;
use crate::models_cdx::CdxBom;
use serde_json::Value;
use std::io::Write;

/// Parse CycloneDX from an already decoded JSON value
pub fn from_value(value: Value) -> Result<CdxBom, ConverterError> {
    serde_json::from_value(value)
        .map_err(|e| ConverterError::ParseError(format!("Failed to parse CycloneDX JSON: {}", e)))
}

/// Write CycloneDX as pretty JSON
pub fn write<W: Write>(writer: W, bom: &CdxBom) -> Result<(), ConverterError> {
    serde_json::to_writer_pretty(writer, bom).map_err(|e| {
        ConverterError::SerializationError(format!("Failed to write CycloneDX JSON: {}", e))
    })
}
