//! CycloneDX version types and utilities

const NAMESPACE_PREFIX: &str = "http://cyclonedx.org/schema/bom/";

/// CycloneDX schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum CdxVersion {
    V1_2,
    V1_3,
    V1_4,
    #[default]
    V1_5,
    V1_6,
}

impl CdxVersion {
    /// Get the version string (e.g., "1.5")
    pub fn as_str(&self) -> &'static str {
        match self {
            CdxVersion::V1_2 => "1.2",
            CdxVersion::V1_3 => "1.3",
            CdxVersion::V1_4 => "1.4",
            CdxVersion::V1_5 => "1.5",
            CdxVersion::V1_6 => "1.6",
        }
    }

    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "1.2" => Some(CdxVersion::V1_2),
            "1.3" => Some(CdxVersion::V1_3),
            "1.4" => Some(CdxVersion::V1_4),
            "1.5" => Some(CdxVersion::V1_5),
            "1.6" => Some(CdxVersion::V1_6),
            _ => None,
        }
    }

    /// Resolve the version from an XML namespace such as
    /// `http://cyclonedx.org/schema/bom/1.4`.
    pub fn from_namespace(ns: &str) -> Option<Self> {
        ns.trim_end_matches('/')
            .strip_prefix(NAMESPACE_PREFIX)
            .and_then(Self::parse)
    }

    /// JSON schema URL written to `$schema`.
    pub fn schema_url(&self) -> String {
        format!("http://cyclonedx.org/schema/bom-{}.schema.json", self.as_str())
    }
}
