//! Strips bulky per-component data from a CycloneDX BOM.
//!
//! Scanners only need identities (name, version, purl), so external
//! references, evidence, hashes and properties are emptied before a BOM is
//! shipped to them.

use crate::models_cdx::{CdxBom, CdxComponent};
use log::debug;
use serde_json::{Map, Value};

/// Returns a trimmed copy of `bom`; the input is left untouched.
pub fn trim_cdx_bom(bom: &CdxBom) -> CdxBom {
    let mut trimmed = bom.clone();
    trimmed.components.iter_mut().for_each(trim_component);
    debug!("Trimmed {} components", trimmed.components.len());
    trimmed
}

fn trim_component(component: &mut CdxComponent) {
    component.external_references = Some(Vec::new());
    component.evidence = Some(Value::Object(Map::new()));
    component.hashes = Some(Vec::new());
    component.properties = Some(Vec::new());
}
