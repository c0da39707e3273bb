//! Tokenizer for the ftrace/perf text trace format.
//!
//! Each event line looks like:
//!
//! ```text
//!   <thread-name>-<tid> [(<tgid>)] [<cpu>] [<flags>] <secs.usecs>: <event>: <details>
//! ```
//!
//! The flags column has four characters, or five on kernels that also print
//! the migrate-disable depth.
//!
//! Marker events (writes to `trace_marker`) carry a tag at the front of
//! their details, which is folded into the event name so that handlers can
//! be registered per tag.

use crate::model::{Pid, Tid};
use crate::utils::config::{marker_event_key, MARKER_EVENT_PREFIX, SECONDS_TO_MILLIS};
use crate::utils::error::LineError;
use regex::Regex;
use std::sync::OnceLock;

/// Fields common to every trace event, plus the event-specific body
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EventFields {
    /// Command name of the thread that emitted the event
    pub thread_name: String,

    pub tid: Tid,

    /// Thread group id, when the trace was recorded with `-o record-tgid`
    pub tgid: Option<Pid>,

    /// Event-specific text after `<event>: `
    pub details: String,
}

impl EventFields {
    /// The process owning the emitting thread
    ///
    /// Without a tgid the thread is treated as its own process.
    pub fn pid(&self) -> Pid {
        self.tgid.unwrap_or(self.tid)
    }
}

/// One tokenized trace event
#[derive(Debug, Clone, PartialEq)]
pub struct TraceRecord {
    pub event_name: String,
    pub cpu: u32,

    /// Milliseconds
    pub timestamp: f64,

    pub fields: EventFields,
}

impl TraceRecord {
    pub fn new(event_name: impl Into<String>, cpu: u32, timestamp: f64, fields: EventFields) -> Self {
        Self {
            event_name: event_name.into(),
            cpu,
            timestamp,
            fields,
        }
    }
}

fn line_regex() -> &'static Regex {
    static LINE_RE: OnceLock<Regex> = OnceLock::new();
    LINE_RE.get_or_init(|| {
        Regex::new(
            r"^\s*(.+)-(\d+)\s+(?:\(\s*(\d+|-+)\)\s+)?\[(\d+)\]\s+(?:[dX.][Nnp.][Hhs.][0-9a-f.]{1,2}\s+)?(\d+\.\d+):\s+(\S+):\s?(.*)$",
        )
        .expect("Invalid regex")
    })
}

fn marker_regex() -> &'static Regex {
    static MARKER_RE: OnceLock<Regex> = OnceLock::new();
    MARKER_RE.get_or_init(|| Regex::new(r"^\s*([\w-]+):\s?(.*)$").expect("Invalid regex"))
}

/// Tokenize one line of trace text
///
/// **Public** - used by the importer and usable on its own
///
/// # Returns
/// * `Ok(None)` - blank or `#` comment line
/// * `Ok(Some(record))` - an event line
///
/// # Errors
/// * `LineError::Malformed` - line does not match the event format
/// * `LineError::InvalidNumber` - a numeric column overflowed
pub fn parse_line(line: &str) -> Result<Option<TraceRecord>, LineError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let caps = line_regex()
        .captures(line)
        .ok_or_else(|| LineError::Malformed(trimmed.to_string()))?;

    let tid = parse_number::<Tid>(&caps[2])?;
    let tgid = match caps.get(3).map(|m| m.as_str()) {
        Some(value) if !value.starts_with('-') => Some(parse_number::<Pid>(value)?),
        _ => None,
    };
    let cpu = parse_number::<u32>(&caps[4])?;
    let seconds = parse_number::<f64>(&caps[5])?;

    let (event_name, details) = split_marker(&caps[6], &caps[7]);

    Ok(Some(TraceRecord {
        event_name,
        cpu,
        timestamp: seconds * SECONDS_TO_MILLIS,
        fields: EventFields {
            thread_name: caps[1].trim().to_string(),
            tid,
            tgid,
            details,
        },
    }))
}

/// Fold a marker tag into the event name
///
/// `tracing_mark_write` with details `tag: body` becomes
/// `tracing_mark_write:tag` with details `body`.
fn split_marker(event_name: &str, details: &str) -> (String, String) {
    if event_name == MARKER_EVENT_PREFIX {
        if let Some(caps) = marker_regex().captures(details) {
            return (marker_event_key(&caps[1]), caps[2].to_string());
        }
    }
    (event_name.to_string(), details.to_string())
}

fn parse_number<T: std::str::FromStr>(value: &str) -> Result<T, LineError> {
    value
        .parse::<T>()
        .map_err(|_| LineError::InvalidNumber(value.to_string()))
}

/// Tokenize a whole trace, yielding 1-based line numbers with each result
///
/// Blank and comment lines are skipped.
pub fn parse_lines(text: &str) -> impl Iterator<Item = (usize, Result<TraceRecord, LineError>)> + '_ {
    text.lines()
        .enumerate()
        .filter_map(|(index, line)| match parse_line(line) {
            Ok(Some(record)) => Some((index + 1, Ok(record))),
            Ok(None) => None,
            Err(e) => Some((index + 1, Err(e))),
        })
}
