use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use crate::{
    converter::ConversionResult,
    schema_version::SchemaVersion,
    validation::ValidationReport,
};

/// Reporter for summarising a conversion in various formats
pub struct ConversionReporter {
    output_format: ReportFormat,
}

/// Available output formats for conversion reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum ReportFormat {
    Console,
    Json,
    Yaml,
}

/// What a conversion did
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionReport {
    pub source_version: SchemaVersion,
    pub target_version: SchemaVersion,
    pub converted_models: Vec<String>,
    pub skipped_models: Vec<String>,
    pub summary: ConversionSummary,
    pub warnings: Vec<String>,
}

/// Counts over the converted document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionSummary {
    pub models_converted: usize,
    pub models_skipped: usize,
    pub columns: usize,
    pub tests: usize,
}

impl ConversionReporter {
    pub fn new() -> Self {
        Self {
            output_format: ReportFormat::Console,
        }
    }

    pub fn with_format(mut self, format: ReportFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Build a report from a finished conversion and its validation result
    pub fn generate_report(
        &self,
        source_version: SchemaVersion,
        result: &ConversionResult,
        validation_report: &ValidationReport,
    ) -> ConversionReport {
        let document = &result.document;

        ConversionReport {
            source_version,
            target_version: document.version,
            converted_models: document.models.iter().map(|m| m.name.clone()).collect(),
            skipped_models: result.skipped_models.clone(),
            summary: ConversionSummary {
                models_converted: document.models.len(),
                models_skipped: result.skipped_models.len(),
                columns: document.column_count(),
                tests: document.test_count(),
            },
            warnings: validation_report
                .warnings
                .iter()
                .map(|w| w.message.clone())
                .collect(),
        }
    }

    /// Format the report according to the configured output format
    pub fn format_report(&self, report: &ConversionReport) -> Result<String, ReportError> {
        match self.output_format {
            ReportFormat::Console => Ok(self.format_console_report(report)),
            ReportFormat::Json => self.format_json_report(report),
            ReportFormat::Yaml => self.format_yaml_report(report),
        }
    }

    fn format_console_report(&self, report: &ConversionReport) -> String {
        let mut output = String::new();

        output.push_str("=== Schema Conversion Report ===\n\n");
        output.push_str(&format!("Source Version: {}\n", report.source_version));
        output.push_str(&format!("Target Version: {}\n\n", report.target_version));

        output.push_str(&format!(
            "Models Converted: {} ({} columns, {} tests)\n",
            report.summary.models_converted, report.summary.columns, report.summary.tests
        ));
        for name in &report.converted_models {
            output.push_str(&format!("  ✓ {}\n", name));
        }

        if !report.skipped_models.is_empty() {
            output.push_str(&format!(
                "Models Skipped (no constraints): {}\n",
                report.summary.models_skipped
            ));
            for name in &report.skipped_models {
                output.push_str(&format!("  ℹ {}\n", name));
            }
        }

        if !report.warnings.is_empty() {
            output.push_str("\nWarnings:\n");
            for warning in &report.warnings {
                output.push_str(&format!("  ⚠ {}\n", warning));
            }
        }

        output
    }

    fn format_json_report(&self, report: &ConversionReport) -> Result<String, ReportError> {
        serde_json::to_string_pretty(report)
            .map_err(|e| ReportError::SerializationError(e.to_string()))
    }

    fn format_yaml_report(&self, report: &ConversionReport) -> Result<String, ReportError> {
        serde_yaml::to_string(report)
            .map_err(|e| ReportError::SerializationError(e.to_string()))
    }
}

impl Default for ConversionReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Serialization error: {0}")]
    SerializationError(String),
}
