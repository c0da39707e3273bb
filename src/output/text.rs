//! Plain text summary for terminal output.

use crate::importer::ImportResult;
use crate::model::TimelineEntity;
use crate::utils::error::ImportErrorKind;
use std::fmt::Write;

const KINDS: [ImportErrorKind; 4] = [
    ImportErrorKind::UnrecognizedEventType,
    ImportErrorKind::HandlerRejected,
    ImportErrorKind::HandlerDiagnostic,
    ImportErrorKind::MalformedLine,
];

/// Render a human readable summary of an import
///
/// Shows up to `max_rows` processes in pid order, then error counts by kind.
pub fn generate_text_summary(result: &ImportResult, max_rows: usize) -> String {
    let mut out = String::new();
    let model = &result.model;

    let _ = writeln!(out, "Records:   {}", result.records);
    let _ = writeln!(out, "Processes: {}", model.process_count());
    let _ = writeln!(out, "CPUs:      {}", model.cpus().count());
    if let Some(offset) = model.clock_sync_offset() {
        let _ = writeln!(out, "Clock sync offset: {:.3} ms", offset);
    }

    if model.process_count() > 0 {
        let _ = writeln!(out);
        let _ = writeln!(out, "{:<12} {:>8} {:>8}  {}", "PROCESS", "THREADS", "SLICES", "DETAILS");
        for process in model.processes().take(max_rows) {
            let _ = writeln!(
                out,
                "{:<12} {:>8} {:>8}  {}",
                process.user_friendly_name(),
                process.thread_count(),
                process.slice_count(),
                process.user_friendly_details()
            );
        }
        if model.process_count() > max_rows {
            let _ = writeln!(out, "... {} more", model.process_count() - max_rows);
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Import errors: {}", result.errors.len());
    for kind in KINDS {
        let count = result.error_count(kind);
        if count > 0 {
            let _ = writeln!(out, "  {:<24} {}", kind.to_string(), count);
        }
    }

    out
}
