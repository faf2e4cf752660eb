//! Main library for the SBOM normalizer.
//!
//! This crate turns the SBOM formats found in the wild (SPDX 2.3 JSON,
//! CycloneDX JSON and CycloneDX XML) into a single CycloneDX JSON
//! representation, and carries the small helpers built on top of it:
//! trimming and end-of-life status derivation.

pub mod cdx_version;
pub mod converter_spdx_to_cdx;
pub mod eol;
pub mod errors;
pub mod formats;
pub mod models_cdx;
pub mod models_eol;
pub mod models_spdx;
pub mod trim;
pub mod version_detection;

use errors::ConverterError;
use formats::Format;
use log::info;
use models_cdx::CdxBom;
use serde_json::Value;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;
use version_detection::SbomFormat;

/// Top-level configuration for a normalization run.
#[derive(Debug)]
pub struct Config {
    pub input_file: PathBuf,
    /// Standard output when `None`.
    pub output_file: Option<PathBuf>,
    /// Sniffed from content (then extension) when `None`.
    pub input_format: Option<Format>,
    pub trim: bool,
    /// Write the list of PURLs instead of the BOM.
    pub purls_only: bool,
}

/// Normalizes a document in the given syntax into a CycloneDX BOM.
///
/// XML is always read as CycloneDX. JSON is classified first: CycloneDX
/// passes through unchanged, SPDX is converted, anything else is rejected.
pub fn normalize_str(content: &str, format: Format) -> Result<CdxBom, ConverterError> {
    match format {
        Format::Xml => {
            info!("Normalizing CycloneDX XML...");
            formats::cdx::xml::xml_str_to_bom(content)
        }
        Format::Json => {
            let value: Value = serde_json::from_str(content)?;
            let detected = version_detection::detect_format(&value);
            info!(
                "Detected {}",
                version_detection::format_description(&detected)
            );

            match detected {
                SbomFormat::CycloneDx(_) => formats::cdx::json::from_value(value),
                SbomFormat::Spdx(_) => {
                    let spdx = formats::spdx::json::from_value(value)?;
                    converter_spdx_to_cdx::convert(&spdx)
                }
                SbomFormat::Unknown => Err(ConverterError::UnsupportedFormat(
                    "Input is neither a CycloneDX BOM nor an SPDX document".to_string(),
                )),
            }
        }
    }
}

/// The main entry point for the normalization pipeline.
///
/// Reads the input file, normalizes it, optionally trims it, and writes
/// either the BOM or its PURL list.
pub fn run(config: Config) -> Result<(), ConverterError> {
    let start_time = Instant::now();
    info!("Starting normalization");
    info!("  Input: {}", config.input_file.display());
    match &config.output_file {
        Some(path) => info!("  Output: {}", path.display()),
        None => info!("  Output: <stdout>"),
    }

    let content = std::fs::read_to_string(&config.input_file)
        .map_err(|e| ConverterError::Io(e, "Failed to read input file".to_string()))?;

    let input_format = match config.input_format {
        Some(format) => format,
        None => Format::detect(&config.input_file, content.as_bytes())?,
    };
    info!("  Input format: {:?}", input_format);

    let conversion_start = Instant::now();
    let mut bom = normalize_str(&content, input_format)?;
    info!(
        "Normalized {} components. (Took {:.2?})",
        bom.components.len(),
        conversion_start.elapsed()
    );

    if config.trim {
        bom = trim::trim_cdx_bom(&bom);
        info!("Trimmed component data.");
    }

    let writer: Box<dyn Write> = match &config.output_file {
        Some(path) => Box::new(
            File::create(path)
                .map_err(|e| ConverterError::Io(e, "Failed to create output file".to_string()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    let mut writer = BufWriter::new(writer);

    if config.purls_only {
        let purls = eol::extract_purls_from_cdx_bom(&bom);
        info!("Extracted {} purls.", purls.len());
        serde_json::to_writer_pretty(&mut writer, &purls).map_err(|e| {
            ConverterError::SerializationError(format!("Failed to write purl list: {}", e))
        })?;
    } else {
        formats::cdx::json::write(&mut writer, &bom)?;
    }
    writeln!(writer)
        .and_then(|_| writer.flush())
        .map_err(|e| ConverterError::Io(e, "Failed to write output".to_string()))?;

    info!("Total execution time: {:.2?}", start_time.elapsed());
    Ok(())
}
