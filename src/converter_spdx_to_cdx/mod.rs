//! SPDX 2.3 -> CycloneDX 1.5 conversion.
//!
//! The conversion runs in three steps over an already parsed document:
//!
//! 1. Map every package to a component and index it by SPDX identifier.
//! 2. Fold all relationships into a per-component scope (highest rank wins).
//! 3. Rebuild the dependency graph from `*DEPENDENCY_OF` relationships.
//!
//! It is deliberately forgiving. Missing optional data becomes empty
//! values, and relationships pointing at unknown packages are dropped.
//! Only missing document-level creation info is reported as an error.

pub mod components;
pub mod relationships;
pub mod scope;

use crate::cdx_version::CdxVersion;
use crate::errors::ConverterError;
use crate::models_cdx::{self as cdx, CdxBom, CdxMetadata, CdxTool, CdxTools};
use crate::models_spdx::SpdxDocument;
use log::{info, warn};
use regex::Regex;
use relationships::PackageIndex;
use serde_json::Map;
use std::sync::LazyLock;
use uuid::Uuid;

const TOOL_PREFIX: &str = "Tool: ";

static TOOL_NAME_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+)[-@](\d.*)$").expect("static regex"));

/// Source of BOM serial numbers.
pub trait SerialNumberGenerator {
    fn next_serial(&mut self) -> Uuid;
}

/// Random (v4) serial numbers.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomSerialNumbers;

impl SerialNumberGenerator for RandomSerialNumbers {
    fn next_serial(&mut self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Converts an SPDX document using a random serial number.
pub fn convert(spdx: &SpdxDocument) -> Result<CdxBom, ConverterError> {
    convert_with(spdx, &mut RandomSerialNumbers)
}

/// Converts an SPDX document, taking the serial number from `serials`.
pub fn convert_with<G>(spdx: &SpdxDocument, serials: &mut G) -> Result<CdxBom, ConverterError>
where
    G: SerialNumberGenerator + ?Sized,
{
    let creation_info = spdx.creation_info.as_ref().ok_or_else(|| {
        ConverterError::InvalidInput("SPDX document is missing 'creationInfo'".to_string())
    })?;
    let created = creation_info.created.as_deref().ok_or_else(|| {
        ConverterError::InvalidInput("SPDX document is missing 'creationInfo.created'".to_string())
    })?;
    let creators = creation_info.creators.as_deref().ok_or_else(|| {
        ConverterError::InvalidInput("SPDX document is missing 'creationInfo.creators'".to_string())
    })?;

    info!(
        "Converting SPDX document '{}': {} packages, {} relationships",
        spdx.name,
        spdx.packages.len(),
        spdx.relationships.len()
    );

    // --- Components ---
    let mut mapped = components::map_packages(&spdx.packages, &spdx.document_describes);

    let mut index: PackageIndex<'_> = PackageIndex::with_capacity(mapped.len());
    for (slot, package) in mapped.iter().enumerate() {
        index.insert(package.spdx_id, slot);
    }

    // --- Scopes ---
    for (slot, scope) in scope::resolve_scopes(&spdx.relationships, &index) {
        mapped[slot].component.scope = Some(scope);
    }

    // --- Dependencies ---
    let bom_refs: Vec<String> = mapped.iter().map(|p| p.bom_ref().to_string()).collect();
    let dependencies =
        relationships::build_dependencies(&spdx.relationships, &index, &bom_refs);

    // --- Root selection ---
    let root_count = mapped.iter().filter(|p| p.is_root).count();
    if root_count > 1 {
        warn!(
            "documentDescribes names {} packages; the last one is used as the root component",
            root_count
        );
    }

    let mut root = None;
    let mut components = Vec::with_capacity(mapped.len());
    for package in mapped {
        if package.is_root {
            root = Some(Box::new(package.component));
        } else {
            components.push(package.component);
        }
    }

    info!(
        "Converted {} components and {} dependency records (root: {})",
        components.len(),
        dependencies.len(),
        root.as_ref().and_then(|c| c.bom_ref.as_deref()).unwrap_or("none")
    );

    let version = CdxVersion::V1_5;
    Ok(CdxBom {
        schema: Some(version.schema_url()),
        bom_format: cdx::BOM_FORMAT.to_string(),
        spec_version: version.as_str().to_string(),
        serial_number: Some(format!("urn:uuid:{}", serials.next_serial())),
        version: 1,
        metadata: Some(CdxMetadata {
            timestamp: Some(created.to_string()),
            tools: Some(CdxTools::List(parse_tools(creators))),
            component: root,
            extra: Map::new(),
        }),
        components,
        dependencies,
        extra: Map::new(),
    })
}

/// Extracts `Tool: ` creators as `{name, version}` pairs.
pub fn parse_tools(creators: &[String]) -> Vec<CdxTool> {
    creators
        .iter()
        .filter_map(|creator| creator.strip_prefix(TOOL_PREFIX))
        .map(parse_tool)
        .collect()
}

/// Splits `name-1.2.3` / `name@1.2.3` at the last separator followed by a
/// digit.
fn parse_tool(tool: &str) -> CdxTool {
    let (name, version) = match TOOL_NAME_VERSION.captures(tool) {
        Some(caps) => (caps[1].to_string(), caps[2].to_string()),
        None => (tool.to_string(), String::new()),
    };
    CdxTool {
        name,
        version,
        ..Default::default()
    }
}
