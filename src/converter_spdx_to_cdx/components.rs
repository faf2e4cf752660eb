//! Package -> component field mapping.

use crate::models_cdx::{
    self as cdx, CdxComponent, CdxExternalReference, CdxHash, CdxHashAlgorithm, CdxLicense,
    CdxLicenseChoice, LicenseAcknowledgement,
};
use crate::models_spdx::{NOASSERTION, SpdxChecksum, SpdxPackage};
use log::{debug, warn};
use regex::Regex;
use serde_json::Map;
use std::collections::HashSet;
use std::sync::LazyLock;

// ASCII word boundaries: a non-ASCII letter does not extend an operator word.
static LICENSE_EXPRESSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u:\b)(AND|OR|WITH)(?-u:\b)|\(|\)").expect("static regex")
});

/// A converted package together with the SPDX identifier it came from.
#[derive(Debug)]
pub(crate) struct MappedPackage<'a> {
    pub spdx_id: &'a str,
    pub component: CdxComponent,
    pub is_root: bool,
}

impl MappedPackage<'_> {
    pub fn bom_ref(&self) -> &str {
        self.component.bom_ref.as_deref().unwrap_or_default()
    }
}

/// Maps every package, in input order.
///
/// Packages listed in `describes` are flagged as root candidates. bom-refs
/// are unique across the result: when two packages share `name@version`,
/// the later one falls back to its SPDX identifier, suffixed with `#n`
/// if that is taken as well.
pub(crate) fn map_packages<'a>(
    packages: &'a [SpdxPackage],
    describes: &[String],
) -> Vec<MappedPackage<'a>> {
    let describes: HashSet<&str> = describes.iter().map(String::as_str).collect();
    let mut used_refs: HashSet<String> = HashSet::with_capacity(packages.len());

    packages
        .iter()
        .map(|pkg| {
            let mut bom_ref = bom_ref_for(pkg);
            if used_refs.contains(&bom_ref) {
                let fallback = unused_ref(&used_refs, &pkg.spdx_id);
                warn!(
                    "bom-ref '{}' is already taken; using '{}' for package {}",
                    bom_ref, fallback, pkg.spdx_id
                );
                bom_ref = fallback;
            }
            used_refs.insert(bom_ref.clone());

            MappedPackage {
                spdx_id: pkg.spdx_id.as_str(),
                component: map_package(pkg, bom_ref),
                is_root: describes.contains(pkg.spdx_id.as_str()),
            }
        })
        .collect()
}

/// `base`, or `base#2`, `base#3`, ... for the first one not yet used.
fn unused_ref(used_refs: &HashSet<String>, base: &str) -> String {
    if !used_refs.contains(base) {
        return base.to_string();
    }
    (2..)
        .map(|n| format!("{}#{}", base, n))
        .find(|candidate| !used_refs.contains(candidate))
        .unwrap_or_else(|| base.to_string())
}

/// `{name}@{version}`, with an empty version when none is given.
pub fn bom_ref_for(pkg: &SpdxPackage) -> String {
    format!("{}@{}", pkg.name, pkg.version_info.as_deref().unwrap_or_default())
}

/// Builds the component for a single package. Scope is left unset; it is
/// resolved from relationships afterwards.
pub fn map_package(pkg: &SpdxPackage, bom_ref: String) -> CdxComponent {
    let external_references: Vec<CdxExternalReference> = [
        (cdx::EXTERNAL_REF_WEBSITE, pkg.homepage.as_deref()),
        (cdx::EXTERNAL_REF_DISTRIBUTION, pkg.download_location.as_deref()),
    ]
    .into_iter()
    .filter_map(|(kind, url)| asserted(url).map(|url| CdxExternalReference::new(kind, url)))
    .collect();

    CdxComponent {
        bom_ref: Some(bom_ref),
        component_type: cdx::COMPONENT_TYPE_LIBRARY.to_string(),
        name: pkg.name.clone(),
        version: Some(pkg.version_info.clone().unwrap_or_default()),
        description: Some(pkg.description.clone().unwrap_or_default()),
        purl: Some(pkg.purl().unwrap_or_default().to_string()),
        hashes: pkg
            .checksums
            .as_ref()
            .map(|checksums| checksums.iter().filter_map(map_checksum).collect()),
        licenses: map_license(pkg.license_declared.as_deref()).map(|l| vec![l]),
        external_references: (!external_references.is_empty()).then_some(external_references),
        ..Default::default()
    }
}

/// SPDX checksum algorithm name -> CycloneDX hash algorithm.
pub fn map_checksum_algorithm(algorithm: &str) -> Option<CdxHashAlgorithm> {
    let alg = match algorithm {
        "MD5" => CdxHashAlgorithm::Md5,
        "SHA1" => CdxHashAlgorithm::Sha1,
        "SHA256" => CdxHashAlgorithm::Sha256,
        "SHA384" => CdxHashAlgorithm::Sha384,
        "SHA512" => CdxHashAlgorithm::Sha512,
        "SHA3-256" => CdxHashAlgorithm::Sha3_256,
        "SHA3-384" => CdxHashAlgorithm::Sha3_384,
        "SHA3-512" => CdxHashAlgorithm::Sha3_512,
        "BLAKE2b-256" => CdxHashAlgorithm::Blake2b256,
        "BLAKE2b-384" => CdxHashAlgorithm::Blake2b384,
        "BLAKE2b-512" => CdxHashAlgorithm::Blake2b512,
        "BLAKE3" => CdxHashAlgorithm::Blake3,
        _ => return None,
    };
    Some(alg)
}

fn map_checksum(checksum: &SpdxChecksum) -> Option<CdxHash> {
    let Some(alg) = map_checksum_algorithm(&checksum.algorithm) else {
        debug!("Dropping checksum with unsupported algorithm '{}'", checksum.algorithm);
        return None;
    };
    Some(CdxHash {
        alg,
        content: checksum.checksum_value.clone(),
    })
}

/// Declared license -> a single license entry (expression or id).
pub fn map_license(declared: Option<&str>) -> Option<CdxLicenseChoice> {
    let declared = asserted(declared)?;
    let choice = if LICENSE_EXPRESSION.is_match(declared) {
        CdxLicenseChoice::Expression {
            expression: declared.to_string(),
            acknowledgement: Some(LicenseAcknowledgement::Declared),
            extra: Map::new(),
        }
    } else {
        CdxLicenseChoice::License {
            license: CdxLicense {
                id: Some(declared.to_string()),
                acknowledgement: Some(LicenseAcknowledgement::Declared),
                ..Default::default()
            },
        }
    };
    Some(choice)
}

/// Filters out missing, empty and `NOASSERTION` values.
fn asserted(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty() && *v != NOASSERTION)
}
