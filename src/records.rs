use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_yaml::Mapping;
use crate::schema_version::SchemaVersion;

/// A single version 2 test attached to a column (or a model)
#[derive(Debug, Clone, PartialEq)]
pub enum TestEntry {
    /// Parameterless test, written as a plain scalar: `- unique`
    Bare(String),
    /// Test with parameters, written as a single-key mapping:
    /// `- accepted_values: {values: [a, b]}`
    Parameterized { kind: String, params: Mapping },
}

impl TestEntry {
    pub fn bare(kind: impl Into<String>) -> Self {
        TestEntry::Bare(kind.into())
    }

    pub fn parameterized(kind: impl Into<String>, params: Mapping) -> Self {
        TestEntry::Parameterized {
            kind: kind.into(),
            params,
        }
    }

    /// The test kind name, regardless of shape
    pub fn kind(&self) -> &str {
        match self {
            TestEntry::Bare(kind) => kind,
            TestEntry::Parameterized { kind, .. } => kind,
        }
    }
}

impl Serialize for TestEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TestEntry::Bare(kind) => serializer.serialize_str(kind),
            TestEntry::Parameterized { kind, params } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(kind, params)?;
                map.end()
            }
        }
    }
}

/// A column and the tests declared against it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnRecord {
    pub name: String,
    pub tests: Vec<TestEntry>,
}

impl ColumnRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tests: Vec::new(),
        }
    }
}

/// One converted model in the output document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelRecord {
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tests: Vec<TestEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<ColumnRecord>,
}

impl ModelRecord {
    pub fn test_count(&self) -> usize {
        self.tests.len() + self.columns.iter().map(|c| c.tests.len()).sum::<usize>()
    }
}

/// The complete version 2 document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaDocument {
    pub version: SchemaVersion,
    pub models: Vec<ModelRecord>,
}

impl SchemaDocument {
    pub fn new(models: Vec<ModelRecord>) -> Self {
        Self {
            version: SchemaVersion::V2,
            models,
        }
    }

    /// Models keep input order after conversion; call this when a stable
    /// ordering across runs is wanted.
    pub fn sort_models_by_name(&mut self) {
        self.models.sort_by(|a, b| a.name.cmp(&b.name));
    }

    pub fn column_count(&self) -> usize {
        self.models.iter().map(|m| m.columns.len()).sum()
    }

    pub fn test_count(&self) -> usize {
        self.models.iter().map(ModelRecord::test_count).sum()
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}
