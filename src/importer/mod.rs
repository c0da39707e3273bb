//! Importing traces into the timeline model.

pub mod linux_perf;
pub mod result;

pub use linux_perf::{import_trace, ImportState, Importer};
pub use result::ImportResult;
