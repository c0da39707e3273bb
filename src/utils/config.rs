//! Configuration and constants for the importer and CLI.

/// Current output schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Event name used by writes to the ftrace `trace_marker` file
pub const MARKER_EVENT_PREFIX: &str = "tracing_mark_write";

/// Marker tag of the trace clock synchronization event
pub const CLOCK_SYNC_MARKER: &str = "trace_event_clock_sync";

// perf reports seconds, the timeline model works in milliseconds
pub const SECONDS_TO_MILLIS: f64 = 1000.0;

/// Number of processes shown by the text summary
pub const DEFAULT_SUMMARY_ROWS: usize = 20;

/// Build the composite handler key for a marker event tag
pub fn marker_event_key(tag: &str) -> String {
    format!("{}:{}", MARKER_EVENT_PREFIX, tag)
}
