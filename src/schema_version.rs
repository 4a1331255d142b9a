use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use crate::source::SourceDocument;

/// Layout version of a dbt schema document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaVersion(pub i128);

impl SchemaVersion {
    /// Constraint-grouped layout
    pub const V1: SchemaVersion = SchemaVersion(1);
    /// Per-column test layout
    pub const V2: SchemaVersion = SchemaVersion(2);

    /// Detect the version of a loaded document.
    ///
    /// Only an integer top-level `version` counts. Anything else under that
    /// key is a model that happens to be called `version`, and the document
    /// is treated as version 1.
    pub fn detect(document: &SourceDocument) -> SchemaVersion {
        document
            .version_value()
            .and_then(SchemaVersion::from_value)
            .unwrap_or(SchemaVersion::V1)
    }

    /// Read an integer version node, whatever its magnitude
    pub fn from_value(value: &Value) -> Option<SchemaVersion> {
        value
            .as_i64()
            .map(i128::from)
            .or_else(|| value.as_u64().map(i128::from))
            .map(SchemaVersion)
    }

    pub fn is_v1(&self) -> bool {
        *self == SchemaVersion::V1
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SchemaVersion {
    type Err = SchemaVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('v');
        trimmed
            .parse()
            .map(SchemaVersion)
            .map_err(|_| SchemaVersionError::InvalidFormat(s.to_string()))
    }
}

#[derive(Debug, Error)]
pub enum SchemaVersionError {
    #[error("Invalid version format: {0}")]
    InvalidFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(yaml: &str) -> SourceDocument {
        yaml.parse().unwrap()
    }

    #[test]
    fn test_detect_defaults_to_v1() {
        let doc = load(
            r#"
            foo:
              constraints:
                unique: [id]
            "#
        );

        assert_eq!(SchemaVersion::detect(&doc), SchemaVersion::V1);
    }

    #[test]
    fn test_detect_explicit_version() {
        assert_eq!(SchemaVersion::detect(&load("version: 2\nmodels: []\n")), SchemaVersion::V2);
        assert!(SchemaVersion::detect(&load("version: 1\n")).is_v1());
        assert_eq!(SchemaVersion::detect(&load("version: -1\n")), SchemaVersion(-1));
    }

    #[test]
    fn test_detect_version_beyond_i64() {
        let doc = load("version: 18446744073709551615\nfoo:\n  constraints:\n    unique: [id]\n");

        let version = SchemaVersion::detect(&doc);
        assert_eq!(version, SchemaVersion(u64::MAX as i128));
        assert!(!version.is_v1());
        assert_eq!(version.to_string(), "18446744073709551615");
    }

    #[test]
    fn test_detect_ignores_model_named_version() {
        let doc = load(
            r#"
            version:
              constraints:
                not_null: [id]
            "#
        );

        assert_eq!(SchemaVersion::detect(&doc), SchemaVersion::V1);
    }

    #[test]
    fn test_non_integer_version_is_not_a_version() {
        assert_eq!(SchemaVersion::from_value(&Value::String("2".into())), None);
        assert_eq!(SchemaVersion::detect(&load("version: 2.0\n")), SchemaVersion::V1);
    }

    #[test]
    fn test_schema_version_display_and_parse() {
        assert_eq!(SchemaVersion::V2.to_string(), "2");
        assert_eq!("v1".parse::<SchemaVersion>().unwrap(), SchemaVersion::V1);
        assert!("two".parse::<SchemaVersion>().is_err());
    }

    #[test]
    fn test_schema_version_ordering() {
        assert!(SchemaVersion::V1 < SchemaVersion::V2);
    }
}
