use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, info};
use crate::{
    cli::Settings,
    converter::{ConversionResult, SchemaConversionError, SchemaConverter},
    schema_version::SchemaVersion,
    source::SourceDocument,
    validation::{OutputValidator, ValidationReport, ValidatorSetupError},
};

/// Errors that end a run. Nothing is written once one of these is raised.
#[derive(Debug, Error)]
pub enum OperationalError {
    #[error("input file at {} does not exist", .0.display())]
    InputMissing(PathBuf),

    #[error("output file at {} already exists and --overwrite was not passed", .0.display())]
    OutputExists(PathBuf),

    #[error("backup file at {} already exists and --overwrite was not passed", .0.display())]
    BackupExists(PathBuf),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to serialize converted schema: {0}")]
    Serialize(#[source] serde_yaml::Error),

    #[error("schema conversion failed: {0}")]
    Conversion(#[from] SchemaConversionError),

    #[error("converted schema failed validation with {} error(s)", .0.errors.len())]
    ValidationFailed(ValidationReport),

    #[error("validator setup failed: {0}")]
    Validator(#[from] ValidatorSetupError),
}

/// A finished conversion
#[derive(Debug, Clone)]
pub struct Conversion {
    pub source_version: SchemaVersion,
    pub result: ConversionResult,
    pub validation: ValidationReport,
    /// Set when an existing file was copied aside before writing
    pub backed_up_to: Option<PathBuf>,
}

/// How a run ended when it did not fail
#[derive(Debug, Clone)]
pub enum Outcome {
    Converted(Conversion),
    /// The input is not a version 1 document; nothing was written
    SkippedWrongVersion { found: SchemaVersion },
}

/// Run one conversion end to end.
///
/// The converted document is built and validated in memory before the
/// backup or the output file are touched.
pub fn run(settings: &Settings) -> Result<Outcome, OperationalError> {
    if !settings.input_path.exists() {
        return Err(OperationalError::InputMissing(settings.input_path.clone()));
    }

    let initial = load_document(&settings.input_path)?;

    let source_version = SchemaVersion::detect(&initial);
    if !source_version.is_v1() {
        error!(
            "input file is not a v1 yaml file (reports as {})",
            source_version
        );
        return Ok(Outcome::SkippedWrongVersion { found: source_version });
    }

    if settings.output_path.exists() && !settings.overwrite {
        return Err(OperationalError::OutputExists(settings.output_path.clone()));
    }

    let result = SchemaConverter::new().convert(&initial)?;

    let validation = OutputValidator::new()?.validate(&result.document);
    if validation.has_errors() {
        for problem in &validation.errors {
            error!(path = %problem.instance_path, "{}", problem.message);
        }
        return Err(OperationalError::ValidationFailed(validation));
    }

    let yaml = result.document.to_yaml().map_err(OperationalError::Serialize)?;

    let backed_up_to = match &settings.backup_path {
        Some(backup_path) => {
            backup_file(&settings.output_path, backup_path, settings.overwrite)?
                .then(|| backup_path.clone())
        }
        None => None,
    };

    fs::write(&settings.output_path, yaml).map_err(|source| OperationalError::Io {
        path: settings.output_path.clone(),
        source,
    })?;

    info!(
        "successfully converted existing {} to {}",
        settings.input_path.display(),
        settings.output_path.display()
    );

    Ok(Outcome::Converted(Conversion {
        source_version,
        result,
        validation,
        backed_up_to,
    }))
}

/// Read and parse a schema document from disk. Repeated constraint kinds
/// survive parsing.
pub fn load_document(path: &Path) -> Result<SourceDocument, OperationalError> {
    let contents = fs::read_to_string(path).map_err(|source| OperationalError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    contents.parse::<SourceDocument>().map_err(|source| OperationalError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Copy `src` to `dst` so the file about to be replaced survives.
///
/// Returns `Ok(false)` when there is nothing at `src` to preserve.
pub fn backup_file(src: &Path, dst: &Path, overwrite: bool) -> Result<bool, OperationalError> {
    if !overwrite && dst.exists() {
        return Err(OperationalError::BackupExists(dst.to_path_buf()));
    }

    if !src.exists() {
        debug!(src = %src.display(), "nothing to back up");
        return Ok(false);
    }

    fs::copy(src, dst).map_err(|source| OperationalError::Io {
        path: dst.to_path_buf(),
        source,
    })?;
    info!("backed up {} to {}", src.display(), dst.display());
    Ok(true)
}
