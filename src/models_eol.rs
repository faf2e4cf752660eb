//! End-of-life scan report data structures.
//!
//! These mirror the JSON returned by the EOL scanning service, so every
//! struct uses camelCase on the wire. Nullable fields are `Option`s.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CveStats {
    pub cve_id: String,
    #[serde(default)]
    pub cvss_score: Option<String>,
    pub published_at: String,
}

/// Lifecycle information for one scanned component.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EolScanComponentMetadata {
    pub is_eol: bool,
    /// RFC 3339 timestamp; may lie in the future.
    #[serde(default)]
    pub eol_at: Option<String>,
    #[serde(default)]
    pub eol_reasons: Vec<String>,
    #[serde(default)]
    pub ecosystem: Option<String>,
    #[serde(default)]
    pub cve_stats: Vec<CveStats>,
    #[serde(default)]
    pub released_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_nes_package: bool,
    #[serde(default)]
    pub next_supported_version: Option<EolScanNextSupportedVersion>,
    #[serde(default)]
    pub days_behind_next_supported: Option<i64>,
    #[serde(default)]
    pub major_versions_from_next_supported: Option<i64>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EolScanNextSupportedVersion {
    pub purl: String,
    pub version: String,
    pub released_at: DateTime<Utc>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct NesRemediation {
    #[serde(default)]
    pub remediations: Vec<Remediation>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Remediation {
    pub purls: RemediationPurls,
    pub urls: RemediationUrls,
}

/// The NES replacement and the original open source package.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RemediationPurls {
    pub nes: String,
    pub oss: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RemediationUrls {
    pub main: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EolScanComponent {
    #[serde(default)]
    pub metadata: Option<EolScanComponentMetadata>,
    pub purl: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nes_remediation: Option<NesRemediation>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EolReportMetadata {
    pub total_components_count: u64,
    pub unknown_components_count: u64,
    pub total_unique_components_count: u64,
}

/// One page of an EOL report.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EolReport {
    pub id: String,
    pub created_on: String,
    #[serde(default)]
    pub components: Vec<EolScanComponent>,
    pub metadata: EolReportMetadata,
    pub page: u64,
    pub total_records: u64,
}

/// Lifecycle status derived from [`EolScanComponentMetadata`].
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComponentStatus {
    Unknown,
    Ok,
    Eol,
    EolUpcoming,
    NesPackage,
}

impl ComponentStatus {
    pub const ALL: [ComponentStatus; 5] = [
        ComponentStatus::Unknown,
        ComponentStatus::Ok,
        ComponentStatus::Eol,
        ComponentStatus::EolUpcoming,
        ComponentStatus::NesPackage,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ComponentStatus::Unknown => "UNKNOWN",
            ComponentStatus::Ok => "OK",
            ComponentStatus::Eol => "EOL",
            ComponentStatus::EolUpcoming => "EOL_UPCOMING",
            ComponentStatus::NesPackage => "NES_PACKAGE",
        }
    }
}

impl std::fmt::Display for ComponentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
