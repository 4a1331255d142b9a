// dbt schema.yml conversion from version 1 constraints to version 2 column tests
pub mod schema_version;
pub mod test_kind;
pub mod source;
pub mod records;
pub mod canonical;
pub mod model_builder;
pub mod converter;
pub mod validation;
pub mod reporter;
pub mod cli;
pub mod runner;
pub mod logging;

// Re-export core types for convenience
pub use schema_version::SchemaVersion;
pub use test_kind::TestKind;
pub use source::SourceDocument;
pub use records::{ColumnRecord, ModelRecord, SchemaDocument, TestEntry};
pub use model_builder::ModelTestBuilder;
pub use converter::{convert_schema, ConversionResult, SchemaConversionError, SchemaConverter};
pub use validation::{OutputValidator, ValidationReport};
pub use reporter::{ConversionReport, ConversionReporter, ReportFormat};
pub use cli::{Args, Settings};
pub use runner::{run, OperationalError, Outcome};
