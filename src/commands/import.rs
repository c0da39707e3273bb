//! Import command implementation.
//!
//! The import command:
//! 1. Reads the trace file
//! 2. Runs the importer with the built-in parser modules
//! 3. Reports import errors
//! 4. Writes the JSON summary

use crate::importer::{ImportResult, Importer};
use crate::output::{generate_text_summary, to_summary, write_summary};
use crate::parser::ParserRegistry;
use crate::utils::config::DEFAULT_SUMMARY_ROWS;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::time::Instant;

/// Arguments for the import command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ImportArgs {
    /// Trace file in perf/ftrace text format
    pub input: PathBuf,

    /// Output path for the JSON summary (optional)
    pub output_json: Option<PathBuf>,

    /// Print text summary to stdout
    pub print_summary: bool,

    /// Number of processes in the text summary
    pub summary_rows: usize,

    /// Fail when more import errors than this were recorded
    pub max_errors: Option<usize>,
}

impl Default for ImportArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from("trace.txt"),
            output_json: None,
            print_summary: false,
            summary_rows: DEFAULT_SUMMARY_ROWS,
            max_errors: None,
        }
    }
}

/// Execute the import command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Trace file cannot be read
/// * Importer structural failure
/// * Summary write failure
/// * More import errors than `max_errors`
pub fn execute_import(args: &ImportArgs, parsers: &ParserRegistry) -> Result<ImportResult> {
    let start_time = Instant::now();

    info!("Importing trace: {}", args.input.display());

    let text = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read trace file {}", args.input.display()))?;

    debug!("Read {} bytes", text.len());

    let result = Importer::new(parsers)
        .import_text(&text)
        .context("Failed to import trace")?;

    if !result.is_clean() {
        warn!("{} import errors recorded", result.errors.len());
        for error in result.errors.iter().take(5) {
            debug!("  {}", error);
        }
    }

    if let Some(output) = &args.output_json {
        let source = args.input.display().to_string();
        let summary = to_summary(&result, Some(source.as_str()));
        write_summary(&summary, output).context("Failed to write summary JSON")?;
        info!("✓ Summary written to: {}", output.display());
    }

    if args.print_summary {
        println!("\n{}", "=".repeat(80));
        println!("IMPORT SUMMARY");
        println!("{}", "=".repeat(80));
        println!("Trace: {}", args.input.display());
        println!("{}", generate_text_summary(&result, args.summary_rows));
        println!("{}", "=".repeat(80));
    }

    if let Some(max_errors) = args.max_errors {
        if result.errors.len() > max_errors {
            anyhow::bail!(
                "{} import errors recorded (allowed: {})",
                result.errors.len(),
                max_errors
            );
        }
    }

    let elapsed = start_time.elapsed();
    info!("Import completed in {:.2}s", elapsed.as_secs_f64());

    Ok(result)
}

/// Validate import arguments
///
/// **Public** - can be called before execute_import for early validation
pub fn validate_args(args: &ImportArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input path cannot be empty");
    }

    if !args.input.is_file() {
        anyhow::bail!("Input trace not found: {}", args.input.display());
    }

    if args.summary_rows == 0 {
        anyhow::bail!("summary_rows must be greater than 0");
    }

    Ok(())
}
