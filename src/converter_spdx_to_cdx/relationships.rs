//! Dependency graph reconstruction from SPDX relationships.
//!
//! SPDX expresses dependencies backwards (`A DEPENDENCY_OF B` means B
//! depends on A), so every edge is recorded on the relationship's
//! *related* element.

use super::scope::scope_for_relationship;
use crate::models_cdx::{CdxDependency, CdxScope};
use crate::models_spdx::SpdxRelationship;
use indexmap::{IndexMap, IndexSet};
use log::debug;
use serde_json::Map;

/// SPDX identifier -> slot of the mapped package, in first-seen order.
pub(crate) type PackageIndex<'a> = IndexMap<&'a str, usize>;

const DEPENDENCY_OF: &str = "DEPENDENCY_OF";

/// Resolves both ends of a relationship to package slots.
///
/// Returns `(element, related)`, or `None` if either identifier is not a
/// known package.
pub(crate) fn resolve_endpoints(
    rel: &SpdxRelationship,
    index: &PackageIndex<'_>,
) -> Option<(usize, usize)> {
    let from = index.get(rel.spdx_element_id.as_str())?;
    let to = index.get(rel.related_spdx_element.as_str())?;
    Some((*from, *to))
}

/// Builds one dependency record per indexed package, in index order.
///
/// `bom_refs[slot]` is the bom-ref of the package in that slot.
pub(crate) fn build_dependencies(
    relationships: &[SpdxRelationship],
    index: &PackageIndex<'_>,
    bom_refs: &[String],
) -> Vec<CdxDependency> {
    let mut graph: IndexMap<usize, IndexSet<usize>> = index
        .values()
        .map(|slot| (*slot, IndexSet::new()))
        .collect();

    let mut dropped = 0usize;
    for rel in relationships {
        let Some((from, to)) = resolve_endpoints(rel, index) else {
            debug!(
                "Dropping relationship {} {} {}: unknown endpoint",
                rel.spdx_element_id, rel.relationship_type, rel.related_spdx_element
            );
            dropped += 1;
            continue;
        };

        if !rel.relationship_type.contains(DEPENDENCY_OF) {
            continue;
        }
        // Optional dependencies still upgrade the scope but stay out of the graph.
        if scope_for_relationship(&rel.relationship_type) == CdxScope::Optional {
            continue;
        }
        if let Some(depends_on) = graph.get_mut(&to) {
            depends_on.insert(from);
        }
    }

    if dropped > 0 {
        debug!("{} relationships referenced unknown packages", dropped);
    }

    graph
        .into_iter()
        .map(|(slot, depends_on)| CdxDependency {
            dep_ref: bom_refs[slot].clone(),
            depends_on: depends_on
                .into_iter()
                .map(|dep| bom_refs[dep].clone())
                .collect(),
            extra: Map::new(),
        })
        .collect()
}
