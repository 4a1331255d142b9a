use std::process;
use clap::Parser;
use tracing::error;
use dbt_schema_upgrade::{
    cli::{Args, Settings},
    logging,
    reporter::ConversionReporter,
    runner::{self, Outcome},
};

const EXIT_FAILURE: i32 = 1;
// 2 is what clap exits with on usage errors
const EXIT_WRONG_VERSION: i32 = 3;

fn main() {
    let settings = Settings::from(Args::parse());

    if let Err(e) = logging::init(&settings.logfile_path) {
        eprintln!("  ⚠ WARNING: {}, continuing without a logfile", e);
    }

    println!("\n=== Schema Conversion ===");
    println!("  ℹ Input:  {}", settings.input_path.display());
    println!("  ℹ Output: {}", settings.output_path.display());

    match runner::run(&settings) {
        Ok(Outcome::Converted(conversion)) => {
            if let Some(backup) = &conversion.backed_up_to {
                println!("  ✓ Backup: {}", backup.display());
            }

            let reporter = ConversionReporter::new().with_format(settings.report_format);
            let report = reporter.generate_report(
                conversion.source_version,
                &conversion.result,
                &conversion.validation,
            );
            match reporter.format_report(&report) {
                Ok(formatted) => println!("\n{}", formatted),
                Err(e) => eprintln!("  ⚠ WARNING: could not format report: {}", e),
            }

            println!("\n=== Conversion Complete ===");
            println!("  ✓ Output file: {}", settings.output_path.display());
        }
        Ok(Outcome::SkippedWrongVersion { found }) => {
            eprintln!(
                "\n⚠ Skipped: {} is not a version 1 schema file (reports as version {})",
                settings.input_path.display(),
                found
            );
            process::exit(EXIT_WRONG_VERSION);
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("\n❌ Error: {}", e);
            if let runner::OperationalError::ValidationFailed(report) = &e {
                for problem in &report.errors {
                    eprintln!("    - {}: {}", problem.instance_path, problem.message);
                }
            }
            process::exit(EXIT_FAILURE);
        }
    }
}
