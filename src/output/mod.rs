//! Output writers for import results.
//!
//! This module handles:
//! - The versioned JSON summary schema
//! - Writing and reading JSON summaries
//! - Text summaries for the terminal

pub mod json;
pub mod schema;
pub mod text;

// Re-export main functions
pub use json::{read_summary, summary_to_string, write_summary};
pub use schema::{to_summary, ImportSummary, ProcessSummary};
pub use text::generate_text_summary;
