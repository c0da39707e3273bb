//! Parses `sched:*` kernel scheduler events.
//!
//! `sched_switch` drives the per-CPU run slices; `sched_wakeup` remembers when
//! a thread became runnable so the slice that eventually runs it can carry the
//! wakeup latency. Both events make sure the thread they name exists in the
//! model.

use crate::parser::handlers::{EventHandlerRegistry, ImportContext};
use crate::parser::line::EventFields;
use crate::parser::registry::{ParserDescriptor, ParserModule, ParserRegistry};
use crate::model::{Slice, Tid, TimelineModel};
use log::debug;
use regex::Regex;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::OnceLock;

fn switch_regex() -> &'static Regex {
    static SWITCH_RE: OnceLock<Regex> = OnceLock::new();
    SWITCH_RE.get_or_init(|| {
        Regex::new(
            r"prev_comm=(.+) prev_pid=(\d+) prev_prio=(\d+) prev_state=(\S+) ==> next_comm=(.+) next_pid=(\d+) next_prio=(\d+)",
        )
        .expect("Invalid regex")
    })
}

fn wakeup_regex() -> &'static Regex {
    static WAKEUP_RE: OnceLock<Regex> = OnceLock::new();
    WAKEUP_RE.get_or_init(|| {
        Regex::new(r"comm=(.+) pid=(\d+) prio=(\d+)(?: success=(\d+))? target_cpu=(\d+)")
            .expect("Invalid regex")
    })
}

/// A parsed `sched_switch` body
#[derive(Debug, Clone, PartialEq)]
pub struct SchedSwitch {
    pub prev_comm: String,
    pub prev_pid: Tid,
    pub prev_state: String,
    pub next_comm: String,
    pub next_pid: Tid,
    pub next_prio: u32,
}

impl SchedSwitch {
    pub fn parse(details: &str) -> Option<Self> {
        let caps = switch_regex().captures(details)?;
        Some(Self {
            prev_comm: caps[1].to_string(),
            prev_pid: caps[2].parse().ok()?,
            prev_state: caps[4].to_string(),
            next_comm: caps[5].to_string(),
            next_pid: caps[6].parse().ok()?,
            next_prio: caps[7].parse().ok()?,
        })
    }
}

/// A parsed `sched_wakeup` body
#[derive(Debug, Clone, PartialEq)]
pub struct SchedWakeup {
    pub comm: String,
    pub pid: Tid,
    pub prio: u32,
    pub target_cpu: u32,
}

impl SchedWakeup {
    pub fn parse(details: &str) -> Option<Self> {
        let caps = wakeup_regex().captures(details)?;
        Some(Self {
            comm: caps[1].to_string(),
            pid: caps[2].parse().ok()?,
            prio: caps[3].parse().ok()?,
            target_cpu: caps[5].parse().ok()?,
        })
    }
}

#[derive(Debug, Default)]
struct SchedState {
    // tid -> timestamp it became runnable
    runnable_since: HashMap<Tid, f64>,
    switches: usize,
}

/// Builds CPU run slices from scheduler events
pub struct SchedParser {
    state: Rc<RefCell<SchedState>>,
}

impl SchedParser {
    /// Constructor registered with the parser registry
    pub fn create(handlers: &mut EventHandlerRegistry) -> Box<dyn ParserModule> {
        let state = Rc::new(RefCell::new(SchedState::default()));

        let switch_state = Rc::clone(&state);
        handlers.register("sched_switch", move |ctx, _, cpu, ts, fields| {
            switch_event(&switch_state, ctx, cpu, ts, fields)
        });

        let wakeup_state = Rc::clone(&state);
        handlers.register("sched_wakeup", move |ctx, _, _, ts, fields| {
            wakeup_event(&wakeup_state, ctx, ts, fields)
        });

        Box::new(Self { state })
    }
}

fn switch_event(
    state: &RefCell<SchedState>,
    ctx: &mut ImportContext<'_>,
    cpu: u32,
    ts: f64,
    fields: &EventFields,
) -> bool {
    let Some(switch) = SchedSwitch::parse(&fields.details) else {
        return false;
    };

    let mut state = state.borrow_mut();
    state.switches += 1;

    if switch.next_pid != 0 {
        ensure_thread(ctx.model, switch.next_pid, &switch.next_comm);
    }

    let cpu = ctx.model.get_or_create_cpu(cpu);

    // pid 0 is the idle task
    if switch.next_pid == 0 {
        cpu.close_running(ts);
        return true;
    }

    let mut slice = Slice::new(switch.next_comm.as_str(), ts)
        .with_arg("tid", switch.next_pid)
        .with_arg("prio", switch.next_prio)
        .with_arg("prev_state", switch.prev_state.as_str());

    if let Some(since) = state.runnable_since.remove(&switch.next_pid) {
        slice = slice.with_arg("wakeup_latency_ms", format!("{:.3}", (ts - since).max(0.0)));
    }

    cpu.switch_to(slice);
    true
}

fn wakeup_event(
    state: &RefCell<SchedState>,
    ctx: &mut ImportContext<'_>,
    ts: f64,
    fields: &EventFields,
) -> bool {
    let Some(wakeup) = SchedWakeup::parse(&fields.details) else {
        return false;
    };

    ensure_thread(ctx.model, wakeup.pid, &wakeup.comm);

    let mut state = state.borrow_mut();
    if state.runnable_since.insert(wakeup.pid, ts).is_some() {
        ctx.errors.diagnostic(format!(
            "thread {} ({}) woken again before it was scheduled",
            wakeup.pid, wakeup.comm
        ));
    }
    true
}

/// Make sure a scheduled thread is in the model
///
/// Scheduler events carry no tgid, so the thread is its own process.
fn ensure_thread(model: &mut TimelineModel, tid: Tid, comm: &str) {
    model
        .get_or_create_process(tid)
        .get_or_create_thread(tid)
        .set_name_if_missing(comm);
}

impl ParserModule for SchedParser {
    fn name(&self) -> &'static str {
        "sched"
    }

    fn finalize(&self, ctx: &mut ImportContext<'_>) {
        let Some(end) = ctx.model.max_timestamp() else {
            return;
        };

        let closed = ctx
            .model
            .cpus_mut()
            .map(|cpu| cpu.close_running(end))
            .filter(|closed| *closed)
            .count();

        debug!(
            "sched: {} switches, closed {} running cpu slices at {}",
            self.state.borrow().switches,
            closed,
            end
        );
    }
}

pub fn register(parsers: &mut ParserRegistry) {
    parsers.register_subtype(ParserDescriptor::new("sched", SchedParser::create));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_switch() {
        let switch = SchedSwitch::parse(
            "prev_comm=swapper prev_pid=0 prev_prio=120 prev_state=R ==> next_comm=Surface Flinger next_pid=178 next_prio=112",
        )
        .unwrap();

        assert_eq!(switch.prev_comm, "swapper");
        assert_eq!(switch.prev_pid, 0);
        assert_eq!(switch.next_comm, "Surface Flinger");
        assert_eq!(switch.next_pid, 178);
        assert_eq!(switch.next_prio, 112);
    }

    #[test]
    fn test_parse_wakeup_without_success() {
        let wakeup = SchedWakeup::parse("comm=app pid=300 prio=120 target_cpu=002").unwrap();
        assert_eq!(wakeup.pid, 300);
        assert_eq!(wakeup.target_cpu, 2);
    }

    #[test]
    fn test_parse_garbage() {
        assert!(SchedSwitch::parse("next_pid=abc").is_none());
        assert!(SchedWakeup::parse("").is_none());
    }
}
