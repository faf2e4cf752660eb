//! Scope classification for SPDX relationship types and rank resolution.
//!
//! Every relationship touching a known target proposes a scope for it.
//! The final scope of a component is the highest-ranked proposal, so the
//! outcome does not depend on relationship order.

use super::relationships::{PackageIndex, resolve_endpoints};
use crate::models_cdx::CdxScope;
use crate::models_spdx::SpdxRelationship;
use std::collections::HashMap;

impl CdxScope {
    /// Precedence rank. Required > Optional > Excluded.
    pub fn rank(self) -> u8 {
        match self {
            CdxScope::Required => 3,
            CdxScope::Optional => 2,
            CdxScope::Excluded => 1,
        }
    }

    /// Applies the upgrade rule: `next` replaces `current` only if it
    /// outranks it.
    pub fn upgrade(current: Option<Self>, next: Self) -> Self {
        match current {
            Some(current) if current.rank() >= next.rank() => current,
            _ => next,
        }
    }
}

/// Maps an SPDX relationship type onto the scope it implies for its target.
pub fn scope_for_relationship(relationship_type: &str) -> CdxScope {
    match relationship_type {
        "OPTIONAL_DEPENDENCY_OF" | "OPTIONAL_DEPENDENCY" => CdxScope::Optional,
        "DEV_DEPENDENCY_OF"
        | "BUILD_DEPENDENCY_OF"
        | "TEST_DEPENDENCY_OF"
        | "DEVELOPMENT_DEPENDENCY_OF"
        | "BUILD_TOOL_OF" => CdxScope::Excluded,
        _ => CdxScope::Required,
    }
}

/// Folds all resolvable relationships into the strongest scope seen per
/// target slot.
pub(crate) fn resolve_scopes(
    relationships: &[SpdxRelationship],
    index: &PackageIndex<'_>,
) -> HashMap<usize, CdxScope> {
    relationships
        .iter()
        .filter_map(|rel| {
            let (_, target) = resolve_endpoints(rel, index)?;
            Some((target, scope_for_relationship(&rel.relationship_type)))
        })
        .fold(HashMap::new(), |mut scopes, (target, scope)| {
            let current = scopes.get(&target).copied();
            scopes.insert(target, CdxScope::upgrade(current, scope));
            scopes
        })
}
