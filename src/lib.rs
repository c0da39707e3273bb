//! Perf Timeline Import
//!
//! Imports linux perf/ftrace text traces into an in-memory model of
//! processes, their threads, and timed slices.
//!
//! Event families are handled by parser modules. Each module registers
//! handlers for the event names it understands; the importer dispatches every
//! trace record to the matching handler and collects per-record problems
//! instead of aborting.
//!
//! ## Getting Started
//!
//! ```ignore
//! use perf_timeline_import::importer::Importer;
//! use perf_timeline_import::parser::ParserRegistry;
//!
//! let parsers = ParserRegistry::with_builtin_parsers();
//! let result = Importer::new(&parsers).import_text(&trace_text)?;
//! for process in result.model.processes() {
//!     println!("{}", process.pid());
//! }
//! ```

pub mod commands;
pub mod importer;
pub mod model;
pub mod output;
pub mod parser;
pub mod utils;
