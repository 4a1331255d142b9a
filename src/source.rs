use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::Deserialize;
use serde_yaml::Value;

/// A version 1 schema document as read from disk.
///
/// `serde_yaml::Value` refuses repeated mapping keys. Here the top level and
/// every `constraints` block keep their entries as ordered pairs, so a kind
/// declared twice reaches the converter twice. Model keys other than
/// `constraints` are not retained.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawDocument")]
pub enum SourceDocument {
    Mapping(Vec<(Value, ModelDefinition)>),
    /// The top level was not a mapping
    Other(Value),
}

/// Everything the converter needs from one top-level entry
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawModel")]
pub enum ModelDefinition {
    /// A mapping; `constraints` is `None` when the key is absent
    Model { constraints: Option<Constraints> },
    /// A scalar or list, such as the value of a top-level `version`
    Other(Value),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawConstraints")]
pub enum Constraints {
    /// Test kind and test values, in document order, repeats included
    Entries(Vec<(Value, Value)>),
    /// `constraints` held something other than a mapping
    Other(Value),
}

impl SourceDocument {
    /// Value of the top-level `version` entry, when it is not a model
    pub fn version_value(&self) -> Option<&Value> {
        match self {
            SourceDocument::Mapping(entries) => entries.iter().find_map(|(key, definition)| {
                match definition {
                    ModelDefinition::Other(value) if key.as_str() == Some("version") => Some(value),
                    _ => None,
                }
            }),
            SourceDocument::Other(_) => None,
        }
    }

    /// Re-read an already loaded value. Repeated keys cannot survive in a
    /// `Value`, so prefer parsing text with [`str::parse`].
    pub fn from_value(value: Value) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_value(value)
    }
}

impl FromStr for SourceDocument {
    type Err = serde_yaml::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_yaml::from_str(s)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDocument {
    Mapping(Entries<ModelDefinition>),
    Other(Value),
}

impl From<RawDocument> for SourceDocument {
    fn from(raw: RawDocument) -> Self {
        match raw {
            RawDocument::Mapping(Entries(entries)) => SourceDocument::Mapping(entries),
            RawDocument::Other(value) => SourceDocument::Other(value),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawModel {
    Model(ModelFields),
    Other(Value),
}

impl From<RawModel> for ModelDefinition {
    fn from(raw: RawModel) -> Self {
        match raw {
            RawModel::Model(fields) => ModelDefinition::Model {
                constraints: fields.constraints,
            },
            RawModel::Other(value) => ModelDefinition::Other(value),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawConstraints {
    Entries(Entries<Value>),
    Other(Value),
}

impl From<RawConstraints> for Constraints {
    fn from(raw: RawConstraints) -> Self {
        match raw {
            RawConstraints::Entries(Entries(entries)) => Constraints::Entries(entries),
            RawConstraints::Other(value) => Constraints::Other(value),
        }
    }
}

/// Mapping entries as ordered pairs, duplicates kept
struct Entries<T>(Vec<(Value, T)>);

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Entries<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for EntriesVisitor<T> {
            type Value = Entries<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<Value, T>()? {
                    entries.push(entry);
                }
                Ok(Entries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

/// The parts of a model mapping the converter reads
struct ModelFields {
    constraints: Option<Constraints>,
}

impl<'de> Deserialize<'de> for ModelFields {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ModelVisitor;

        impl<'de> Visitor<'de> for ModelVisitor {
            type Value = ModelFields;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a model mapping")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut constraints = None;
                while let Some(key) = map.next_key::<Value>()? {
                    if key.as_str() != Some("constraints") {
                        map.next_value::<IgnoredAny>()?;
                        continue;
                    }
                    // a repeated `constraints` block extends the first one
                    let next = map.next_value::<Constraints>()?;
                    constraints = Some(match (constraints, next) {
                        (Some(Constraints::Entries(mut first)), Constraints::Entries(more)) => {
                            first.extend(more);
                            Constraints::Entries(first)
                        }
                        (_, next) => next,
                    });
                }
                Ok(ModelFields { constraints })
            }
        }

        deserializer.deserialize_map(ModelVisitor)
    }
}
