use std::ffi::OsString;
use std::path::{Path, PathBuf};
use clap::Parser;
use crate::reporter::ReportFormat;

pub const DEFAULT_LOGFILE: &str = "upgrade_dbt_schema_tests_v1_to_v2.txt";

#[derive(Parser, Debug)]
#[command(name = "dbt-schema-upgrade", version)]
#[command(about = "Convert a dbt schema.yml from version 1 constraints to version 2 column tests")]
pub struct Args {
    /// Path to the version 1 schema file
    pub input_path: PathBuf,

    /// Where to write the converted file (defaults to INPUT_PATH.new)
    #[arg(long, value_name = "PATH", conflicts_with = "in_place")]
    pub output_path: Option<PathBuf>,

    /// Copy whatever currently sits at the output path here before writing
    #[arg(long, value_name = "PATH", conflicts_with = "in_place")]
    pub backup_path: Option<PathBuf>,

    /// Overwrite existing output and backup files
    #[arg(long)]
    pub overwrite: bool,

    /// Overwrite the input file and keep a ".bak" copy instead of generating a ".new" file
    #[arg(long)]
    pub in_place: bool,

    /// The path to write the logfile to
    #[arg(long, value_name = "PATH", default_value = DEFAULT_LOGFILE)]
    pub logfile_path: PathBuf,

    /// Format of the summary printed after a successful conversion
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    pub report_format: ReportFormat,
}

/// Fully resolved paths and switches for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub backup_path: Option<PathBuf>,
    pub overwrite: bool,
    pub logfile_path: PathBuf,
    pub report_format: ReportFormat,
}

impl From<Args> for Settings {
    fn from(args: Args) -> Self {
        let (output_path, backup_path) = if args.in_place {
            (args.input_path.clone(), Some(with_suffix(&args.input_path, ".bak")))
        } else {
            let output = args
                .output_path
                .unwrap_or_else(|| with_suffix(&args.input_path, ".new"));
            (output, args.backup_path)
        };

        Settings {
            input_path: args.input_path,
            output_path,
            backup_path,
            overwrite: args.overwrite || args.in_place,
            logfile_path: args.logfile_path,
            report_format: args.report_format,
        }
    }
}

/// Append `suffix` to the full file name: `schema.yml` becomes `schema.yml.new`
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut raw: OsString = path.as_os_str().to_owned();
    raw.push(suffix);
    PathBuf::from(raw)
}
