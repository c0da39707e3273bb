//! In-memory timeline model populated by parser modules.
//!
//! This module holds:
//! - Processes keyed by pid, each owning its threads
//! - Per-CPU run slices
//! - Trace-wide facts such as time bounds and clock sync offset

pub mod cpu;
pub mod process;
pub mod thread;

pub use cpu::Cpu;
pub use process::{Pid, TimelineEntity, TimelineProcess};
pub use thread::{Slice, Tid, TimelineThread};

use log::debug;
use std::collections::BTreeMap;

/// The aggregate of everything reconstructed from one trace
///
/// Processes are created lazily on first reference and never replaced,
/// so iteration in pid order is deterministic for a given input.
#[derive(Debug, Clone, Default)]
pub struct TimelineModel {
    processes: BTreeMap<Pid, TimelineProcess>,
    cpus: BTreeMap<u32, Cpu>,
    clock_sync_offset: Option<f64>,
    bounds: Option<(f64, f64)>,
}

impl TimelineModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a process, creating it the first time its pid is seen
    pub fn get_or_create_process(&mut self, pid: Pid) -> &mut TimelineProcess {
        self.processes.entry(pid).or_insert_with(|| {
            debug!("Creating process {}", pid);
            TimelineProcess::new(pid)
        })
    }

    pub fn process(&self, pid: Pid) -> Option<&TimelineProcess> {
        self.processes.get(&pid)
    }

    pub fn process_mut(&mut self, pid: Pid) -> Option<&mut TimelineProcess> {
        self.processes.get_mut(&pid)
    }

    /// Processes in ascending pid order
    pub fn processes(&self) -> impl Iterator<Item = &TimelineProcess> {
        self.processes.values()
    }

    pub(crate) fn processes_mut(&mut self) -> impl Iterator<Item = &mut TimelineProcess> {
        self.processes.values_mut()
    }

    pub fn process_count(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty() && self.cpus.is_empty()
    }

    pub fn get_or_create_cpu(&mut self, number: u32) -> &mut Cpu {
        self.cpus.entry(number).or_insert_with(|| Cpu::new(number))
    }

    pub fn cpu(&self, number: u32) -> Option<&Cpu> {
        self.cpus.get(&number)
    }

    /// CPUs in ascending number order
    pub fn cpus(&self) -> impl Iterator<Item = &Cpu> {
        self.cpus.values()
    }

    pub(crate) fn cpus_mut(&mut self) -> impl Iterator<Item = &mut Cpu> {
        self.cpus.values_mut()
    }

    /// Offset in milliseconds to add to trace timestamps to reach the parent clock
    pub fn clock_sync_offset(&self) -> Option<f64> {
        self.clock_sync_offset
    }

    pub fn set_clock_sync_offset(&mut self, offset: f64) {
        self.clock_sync_offset = Some(offset);
    }

    /// Widen the model's time bounds to include `ts`
    pub fn update_bounds(&mut self, ts: f64) {
        self.bounds = Some(match self.bounds {
            Some((min, max)) => (min.min(ts), max.max(ts)),
            None => (ts, ts),
        });
    }

    pub fn min_timestamp(&self) -> Option<f64> {
        self.bounds.map(|(min, _)| min)
    }

    pub fn max_timestamp(&self) -> Option<f64> {
        self.bounds.map(|(_, max)| max)
    }
}
