//! Handles the `trace_event_clock_sync` marker.
//!
//! A tracing client writes `trace_event_clock_sync: parent_ts=<secs>` to the
//! trace marker so the kernel trace can be aligned with its own clock.

use crate::parser::handlers::{EventHandlerRegistry, ImportContext};
use crate::parser::line::EventFields;
use crate::parser::registry::{ParserDescriptor, ParserModule, ParserRegistry};
use crate::utils::config::{CLOCK_SYNC_MARKER, SECONDS_TO_MILLIS};
use log::debug;
use regex::Regex;
use std::sync::OnceLock;

fn parent_ts_regex() -> &'static Regex {
    static PARENT_TS_RE: OnceLock<Regex> = OnceLock::new();
    PARENT_TS_RE
        .get_or_init(|| Regex::new(r"parent_ts=(\d+(?:\.\d+)?)").expect("Invalid regex"))
}

pub struct ClockSyncParser;

impl ClockSyncParser {
    /// Constructor registered with the parser registry
    pub fn create(handlers: &mut EventHandlerRegistry) -> Box<dyn ParserModule> {
        handlers.register_marker(CLOCK_SYNC_MARKER, |ctx, _, _, ts, fields| {
            clock_sync_event(ctx, ts, fields)
        });
        Box::new(Self)
    }
}

fn clock_sync_event(ctx: &mut ImportContext<'_>, ts: f64, fields: &EventFields) -> bool {
    let Some(parent_ts) = parent_ts_regex()
        .captures(&fields.details)
        .and_then(|caps| caps[1].parse::<f64>().ok())
    else {
        return false;
    };

    let offset = parent_ts * SECONDS_TO_MILLIS - ts;
    if let Some(previous) = ctx.model.clock_sync_offset() {
        ctx.errors.diagnostic(format!(
            "multiple clock sync markers; replacing offset {:.3}ms with {:.3}ms",
            previous, offset
        ));
    }

    debug!("Clock sync: parent clock offset {:.3}ms", offset);
    ctx.model.set_clock_sync_offset(offset);
    true
}

impl ParserModule for ClockSyncParser {
    fn name(&self) -> &'static str {
        "clock_sync"
    }
}

pub fn register(parsers: &mut ParserRegistry) {
    parsers.register_subtype(ParserDescriptor::new("clock_sync", ClockSyncParser::create));
}
