//! Perf Timeline Import CLI
//!
//! Imports linux perf/ftrace text traces and reports the reconstructed
//! processes together with any import errors.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use perf_timeline_import::commands::{
    display_parsers, display_version, execute_import, validate_args, validate_summary_file,
    ImportArgs,
};
use perf_timeline_import::parser::ParserRegistry;
use perf_timeline_import::utils::config::DEFAULT_SUMMARY_ROWS;

/// Perf Timeline Import - linux perf traces to a process timeline
#[derive(Parser, Debug)]
#[command(name = "perf-import")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Import a perf/ftrace text trace
    Import {
        /// Trace file to import
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for JSON summary (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,

        /// Number of processes shown in the text summary
        #[arg(long, default_value_t = DEFAULT_SUMMARY_ROWS)]
        rows: usize,

        /// Fail if more import errors than this are recorded
        #[arg(long, env = "PERF_IMPORT_MAX_ERRORS")]
        max_errors: Option<usize>,
    },

    /// Validate a summary JSON file
    Validate {
        /// Path to summary JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// List registered parser modules and their events
    Parsers,

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Every module registers itself once, before any import runs
    let parsers = ParserRegistry::with_builtin_parsers();

    match cli.command {
        Commands::Import {
            input,
            output,
            summary,
            rows,
            max_errors,
        } => {
            let args = ImportArgs {
                input,
                output_json: output,
                print_summary: summary,
                summary_rows: rows,
                max_errors,
            };

            validate_args(&args)?;
            execute_import(&args, &parsers)?;
        }

        Commands::Validate { file } => {
            validate_summary_file(&file)?;
        }

        Commands::Parsers => {
            display_parsers(&parsers);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
