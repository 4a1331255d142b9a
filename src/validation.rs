use jsonschema::JSONSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;
use crate::{canonical::is_canonical, records::SchemaDocument};

/// JSON Schema (draft 7) describing the version 2 layout this tool writes
pub const V2_DOCUMENT_SCHEMA: &str = r##"{
  "$schema": "http://json-schema.org/draft-07/schema#",
  "type": "object",
  "required": ["version", "models"],
  "additionalProperties": false,
  "properties": {
    "version": { "const": 2 },
    "models": { "type": "array", "items": { "$ref": "#/definitions/model" } }
  },
  "definitions": {
    "test": {
      "oneOf": [
        { "type": "string", "minLength": 1 },
        {
          "type": "object",
          "minProperties": 1,
          "maxProperties": 1,
          "additionalProperties": { "type": "object" }
        }
      ]
    },
    "column": {
      "type": "object",
      "required": ["name", "tests"],
      "additionalProperties": false,
      "properties": {
        "name": { "type": "string" },
        "tests": { "type": "array", "items": { "$ref": "#/definitions/test" } }
      }
    },
    "model": {
      "type": "object",
      "required": ["name"],
      "additionalProperties": false,
      "properties": {
        "name": { "type": "string" },
        "tests": { "type": "array", "minItems": 1, "items": { "$ref": "#/definitions/test" } },
        "columns": { "type": "array", "minItems": 1, "items": { "$ref": "#/definitions/column" } }
      }
    }
  }
}"##;

/// Result of checking a converted document before it is written
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.is_valid = false;
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// A structural problem in the converted document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    pub instance_path: String,
    pub error_type: ValidationErrorType,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationErrorType {
    SchemaViolation,
    OrderingViolation,
}

/// Something worth flagging that does not block the write
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub message: String,
    pub warning_type: ValidationWarningType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationWarningType {
    ValidationSkipped,
}

impl ValidationError {
    pub fn new(instance_path: String, error_type: ValidationErrorType, message: String) -> Self {
        Self {
            instance_path,
            error_type,
            message,
        }
    }
}

impl ValidationWarning {
    pub fn new(message: String, warning_type: ValidationWarningType) -> Self {
        Self { message, warning_type }
    }
}

#[derive(Debug, Error)]
pub enum ValidatorSetupError {
    #[error("Failed to parse embedded schema: {0}")]
    SchemaParse(#[from] serde_json::Error),

    #[error("Failed to compile embedded schema: {0}")]
    SchemaCompile(String),
}

/// Checks converted documents against [`V2_DOCUMENT_SCHEMA`] and the
/// canonical ordering rules
pub struct OutputValidator {
    schema: JSONSchema,
}

impl OutputValidator {
    pub fn new() -> Result<Self, ValidatorSetupError> {
        let schema_json: serde_json::Value = serde_json::from_str(V2_DOCUMENT_SCHEMA)?;
        let schema = JSONSchema::compile(&schema_json)
            .map_err(|e| ValidatorSetupError::SchemaCompile(e.to_string()))?;
        Ok(Self { schema })
    }

    pub fn validate(&self, document: &SchemaDocument) -> ValidationReport {
        let mut report = ValidationReport::new();

        match serde_json::to_value(document) {
            Ok(instance) => {
                if let Err(errors) = self.schema.validate(&instance) {
                    for error in errors {
                        report.add_error(ValidationError::new(
                            error.instance_path.to_string(),
                            ValidationErrorType::SchemaViolation,
                            error.to_string(),
                        ));
                    }
                }
            }
            Err(e) => {
                // Test parameters may use lists or mappings as keys, which
                // YAML allows and JSON cannot express.
                warn!(error = %e, "output not representable as JSON, schema check skipped");
                report.add_warning(ValidationWarning::new(
                    format!("Schema check skipped: {}", e),
                    ValidationWarningType::ValidationSkipped,
                ));
            }
        }

        for (index, model) in document.models.iter().enumerate() {
            if !is_canonical(model) {
                report.add_error(ValidationError::new(
                    format!("/models/{}", index),
                    ValidationErrorType::OrderingViolation,
                    format!("Columns or tests of model {} are not in canonical order", model.name),
                ));
            }
        }

        report
    }
}
