//! Format detection and definition module.
//!
//! Decides whether an input file is JSON or XML. Which SBOM standard the
//! document follows is decided later, see `version_detection`.

pub mod cdx;
pub mod spdx;

use crate::errors::ConverterError;
use clap::ValueEnum;
use std::path::Path;

/// Supported serialization syntaxes
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// JSON (CycloneDX or SPDX)
    Json,
    /// XML (CycloneDX only)
    Xml,
}

impl Format {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Result<Self, ConverterError> {
        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                ConverterError::InvalidInput(format!(
                    "Could not determine file extension for: {}",
                    path.display()
                ))
            })?;

        match extension.to_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "xml" => Ok(Format::Xml),
            ext => Err(ConverterError::InvalidInput(format!(
                "Unsupported file format: .{}. Supported formats: .json, .xml",
                ext
            ))),
        }
    }

    /// Detect format from file content
    pub fn from_content(content: &[u8]) -> Result<Self, ConverterError> {
        let first = content.iter().find(|b| !b.is_ascii_whitespace());

        match first {
            None => Err(ConverterError::InvalidInput(
                "Empty file content".to_string(),
            )),
            Some(b'{') | Some(b'[') => Ok(Format::Json),
            Some(b'<') => Ok(Format::Xml),
            Some(_) => Err(ConverterError::InvalidInput(
                "Could not detect format from content. Expected JSON (starts with '{' or '[') or XML (starts with '<')".to_string()
            )),
        }
    }

    /// Content sniffing first, so a mislabelled `.json` that holds XML is
    /// still read correctly; the extension is the fallback.
    pub fn detect(path: &Path, content: &[u8]) -> Result<Self, ConverterError> {
        Self::from_content(content).or_else(|_| Self::from_extension(path))
    }
}
