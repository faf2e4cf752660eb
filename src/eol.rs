//! Helpers for working with end-of-life scan results.

use crate::models_cdx::{CdxBom, CdxComponent};
use crate::models_eol::{ComponentStatus, EolScanComponentMetadata};
use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use log::debug;
use packageurl::PackageUrl;
use std::str::FromStr;

/// Derives the lifecycle status of a component relative to the current time.
pub fn derive_component_status(metadata: Option<&EolScanComponentMetadata>) -> ComponentStatus {
    derive_component_status_at(metadata, Utc::now())
}

/// Derives the lifecycle status of a component relative to `now`.
///
/// Precedence: no metadata, NES package, explicit EOL flag, then the EOL
/// date. An `eolAt` that does not parse as RFC 3339 counts as absent.
pub fn derive_component_status_at(
    metadata: Option<&EolScanComponentMetadata>,
    now: DateTime<Utc>,
) -> ComponentStatus {
    let Some(metadata) = metadata else {
        return ComponentStatus::Unknown;
    };

    if metadata.is_nes_package {
        return ComponentStatus::NesPackage;
    }
    if metadata.is_eol {
        return ComponentStatus::Eol;
    }

    let eol_at = metadata.eol_at.as_deref().and_then(|raw| {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| debug!("Ignoring unparseable eolAt {:?}: {}", raw, e))
            .ok()
    });

    match eol_at {
        Some(eol_at) if eol_at <= now => ComponentStatus::Eol,
        Some(_) => ComponentStatus::EolUpcoming,
        None => ComponentStatus::Ok,
    }
}

/// Collects every valid PURL in a BOM: component PURLs (nested components
/// included) followed by dependency refs that are themselves PURLs.
/// Duplicates are dropped, keeping the first occurrence.
pub fn extract_purls_from_cdx_bom(bom: &CdxBom) -> Vec<String> {
    let mut purls = IndexSet::new();

    let mut pending: Vec<&CdxComponent> = bom.components.iter().rev().collect();
    while let Some(component) = pending.pop() {
        if let Some(purl) = component.purl.as_deref() {
            collect_purl(&mut purls, purl);
        }
        if let Some(children) = &component.components {
            pending.extend(children.iter().rev());
        }
    }

    for dependency in &bom.dependencies {
        collect_purl(&mut purls, &dependency.dep_ref);
        for target in &dependency.depends_on {
            collect_purl(&mut purls, target);
        }
    }

    purls.into_iter().collect()
}

fn collect_purl(purls: &mut IndexSet<String>, candidate: &str) {
    if purls.contains(candidate) {
        return;
    }
    match PackageUrl::from_str(candidate) {
        Ok(_) => {
            purls.insert(candidate.to_string());
        }
        Err(e) => debug!("Skipping {:?}: not a valid purl ({})", candidate, e),
    }
}
