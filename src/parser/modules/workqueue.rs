//! Parses `workqueue:*` kernel events into thread slices.

use crate::parser::handlers::{EventHandlerRegistry, ImportContext};
use crate::parser::line::EventFields;
use crate::parser::registry::{ParserDescriptor, ParserModule, ParserRegistry};
use crate::model::Slice;
use log::debug;
use regex::Regex;
use std::cell::Cell;
use std::rc::Rc;
use std::sync::OnceLock;

fn start_regex() -> &'static Regex {
    static START_RE: OnceLock<Regex> = OnceLock::new();
    START_RE.get_or_init(|| {
        Regex::new(r"work struct (.+): function (\S+)").expect("Invalid regex")
    })
}

fn end_regex() -> &'static Regex {
    static END_RE: OnceLock<Regex> = OnceLock::new();
    END_RE.get_or_init(|| Regex::new(r"work struct (.+)").expect("Invalid regex"))
}

/// Opens a slice per executed work item on the kworker thread running it
pub struct WorkqueueParser {
    executed: Rc<Cell<usize>>,
}

impl WorkqueueParser {
    /// Constructor registered with the parser registry
    pub fn create(handlers: &mut EventHandlerRegistry) -> Box<dyn ParserModule> {
        let executed = Rc::new(Cell::new(0));

        handlers.register("workqueue_execute_start", |ctx, _, _, ts, fields| {
            execute_start_event(ctx, ts, fields)
        });

        let counter = Rc::clone(&executed);
        handlers.register("workqueue_execute_end", move |ctx, _, _, ts, fields| {
            let ok = execute_end_event(ctx, ts, fields);
            if ok {
                counter.set(counter.get() + 1);
            }
            ok
        });

        Box::new(Self { executed })
    }
}

fn execute_start_event(ctx: &mut ImportContext<'_>, ts: f64, fields: &EventFields) -> bool {
    let Some(caps) = start_regex().captures(&fields.details) else {
        return false;
    };

    let thread = ctx
        .model
        .get_or_create_process(fields.pid())
        .get_or_create_thread(fields.tid);
    thread.set_name_if_missing(&fields.thread_name);
    thread.push_slice(Slice::new(&caps[2], ts).with_arg("work_struct", &caps[1]));
    true
}

fn execute_end_event(ctx: &mut ImportContext<'_>, ts: f64, fields: &EventFields) -> bool {
    if !end_regex().is_match(&fields.details) {
        return false;
    }

    let thread = ctx
        .model
        .get_or_create_process(fields.pid())
        .get_or_create_thread(fields.tid);
    if thread.end_slice(ts).is_none() {
        ctx.errors.diagnostic(format!(
            "workqueue_execute_end on thread {} without a matching start",
            fields.tid
        ));
    }
    true
}

impl ParserModule for WorkqueueParser {
    fn name(&self) -> &'static str {
        "workqueue"
    }

    fn finalize(&self, ctx: &mut ImportContext<'_>) {
        let Some(end) = ctx.model.max_timestamp() else {
            return;
        };

        let mut unfinished = 0;
        for process in ctx.model.processes_mut() {
            for thread in process.threads_mut() {
                unfinished += thread.close_open_slices(end);
            }
        }

        debug!(
            "workqueue: {} work items executed, {} still running at end of trace",
            self.executed.get(),
            unfinished
        );
    }
}

pub fn register(parsers: &mut ParserRegistry) {
    parsers.register_subtype(ParserDescriptor::new("workqueue", WorkqueueParser::create));
}
