use serde_yaml::{Mapping, Value};
use thiserror::Error;
use tracing::debug;
use crate::{
    model_builder::ModelTestBuilder,
    records::SchemaDocument,
    source::{Constraints, ModelDefinition, SourceDocument},
};

/// Errors raised while restructuring constraints into column tests.
///
/// Any of these aborts the whole conversion; no partial document is produced.
#[derive(Debug, Error)]
pub enum SchemaConversionError {
    #[error("Expected a mapping for {context}, got {found}: {raw}")]
    ExpectedMapping {
        context: String,
        found: &'static str,
        raw: String,
    },

    #[error("Expected type \"list\" for test values in constraints under test {test_kind} inside model {model}, got \"{found}\"")]
    ExpectedList {
        test_kind: String,
        model: String,
        found: &'static str,
    },

    #[error("Got an invalid {test_kind} test in model {model}, no \"{designator}\" value in {raw}")]
    MissingDesignator {
        test_kind: String,
        model: String,
        designator: &'static str,
        raw: String,
    },

    #[error("Unrecognized test kind {test_kind} in model {model}")]
    UnrecognizedTestKind {
        test_kind: String,
        model: String,
    },

    #[error("Expected a string for {context}, got {found}: {raw}")]
    InvalidName {
        context: String,
        found: &'static str,
        raw: String,
    },
}

/// Outcome of converting one document
#[derive(Debug, Clone)]
pub struct ConversionResult {
    pub document: SchemaDocument,
    /// Models dropped because they declare no constraints, in input order
    pub skipped_models: Vec<String>,
}

/// Converts version 1 schema documents into the version 2 layout
#[derive(Debug, Default)]
pub struct SchemaConverter;

impl SchemaConverter {
    pub fn new() -> Self {
        Self
    }

    /// Convert a loaded version 1 document.
    ///
    /// Models are emitted in document order. Models without a `constraints`
    /// key (including entries that are not mappings at all, such as a
    /// top-level `version: 1`) contribute nothing, whatever their key.
    pub fn convert(&self, document: &SourceDocument) -> Result<ConversionResult, SchemaConversionError> {
        let top_level = match document {
            SourceDocument::Mapping(entries) => entries,
            SourceDocument::Other(value) => {
                return Err(SchemaConversionError::ExpectedMapping {
                    context: "the top level of the document".to_string(),
                    found: type_name(value),
                    raw: render(value),
                })
            }
        };

        let mut models = Vec::new();
        let mut skipped_models = Vec::new();

        for (key, definition) in top_level {
            let constraints = match definition {
                ModelDefinition::Model { constraints: Some(constraints) } => constraints,
                _ => {
                    let label = key.as_str().map(str::to_string).unwrap_or_else(|| render(key));
                    debug!(model = %label, "no constraints, skipping model");
                    skipped_models.push(label);
                    continue;
                }
            };

            let model_name = expect_name(key, || "a model name".to_string())?;

            let constraints = match constraints {
                Constraints::Entries(entries) => entries,
                Constraints::Other(value) => {
                    return Err(SchemaConversionError::ExpectedMapping {
                        context: format!("constraints inside model {}", model_name),
                        found: type_name(value),
                        raw: render(value),
                    })
                }
            };

            let mut builder = ModelTestBuilder::new(model_name);
            builder.populate_from_constraints(constraints)?;
            let model = builder.generate_model_record();
            debug!(
                model = %model.name,
                columns = model.columns.len(),
                "converted model"
            );
            models.push(model);
        }

        Ok(ConversionResult {
            document: SchemaDocument::new(models),
            skipped_models,
        })
    }
}

/// Convenience wrapper around [`SchemaConverter::convert`]
pub fn convert_schema(document: &SourceDocument) -> Result<SchemaDocument, SchemaConversionError> {
    SchemaConverter::new().convert(document).map(|result| result.document)
}

pub(crate) fn expect_mapping<'a, F>(value: &'a Value, context: F) -> Result<&'a Mapping, SchemaConversionError>
where
    F: FnOnce() -> String,
{
    value.as_mapping().ok_or_else(|| SchemaConversionError::ExpectedMapping {
        context: context(),
        found: type_name(value),
        raw: render(value),
    })
}

pub(crate) fn expect_name<'a, F>(value: &'a Value, context: F) -> Result<&'a str, SchemaConversionError>
where
    F: FnOnce() -> String,
{
    value.as_str().ok_or_else(|| SchemaConversionError::InvalidName {
        context: context(),
        found: type_name(value),
        raw: render(value),
    })
}

/// Human readable name of a YAML node's type, for error messages
pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

/// Compact single-line rendering of a YAML node for error messages
pub(crate) fn render(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("{:?}", value))
}
