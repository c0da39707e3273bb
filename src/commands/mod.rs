//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod import;
pub mod utils;

// Re-export main command functions
pub use import::{execute_import, validate_args, ImportArgs};
pub use utils::{display_parsers, display_version, validate_summary_file};
