//! The TimelineProcess entity.
//!
//! A process is identified by its pid and exclusively owns its threads.
//! Processes order by ascending pid; display strings derive from the pid alone.

use super::thread::{Tid, TimelineThread};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Process identifier as reported by the kernel
pub type Pid = u32;

/// Display capability shared by timeline entities
pub trait TimelineEntity {
    /// Short label, e.g. for a track header
    fn user_friendly_name(&self) -> String;

    /// Longer description shown alongside the name
    fn user_friendly_details(&self) -> String;
}

/// One userland process in the trace
#[derive(Debug, Clone)]
pub struct TimelineProcess {
    pid: Pid,
    threads: BTreeMap<Tid, TimelineThread>,
}

impl TimelineProcess {
    pub fn new(pid: Pid) -> Self {
        Self {
            pid,
            threads: BTreeMap::new(),
        }
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    /// Comparison between processes that orders by pid
    pub fn compare(x: &TimelineProcess, y: &TimelineProcess) -> Ordering {
        x.pid.cmp(&y.pid)
    }

    pub fn compare_to(&self, that: &TimelineProcess) -> Ordering {
        Self::compare(self, that)
    }

    /// Look up a thread, creating it on first reference
    pub fn get_or_create_thread(&mut self, tid: Tid) -> &mut TimelineThread {
        self.threads
            .entry(tid)
            .or_insert_with(|| TimelineThread::new(tid))
    }

    pub fn thread(&self, tid: Tid) -> Option<&TimelineThread> {
        self.threads.get(&tid)
    }

    pub fn thread_mut(&mut self, tid: Tid) -> Option<&mut TimelineThread> {
        self.threads.get_mut(&tid)
    }

    /// Threads in ascending tid order
    pub fn threads(&self) -> impl Iterator<Item = &TimelineThread> {
        self.threads.values()
    }

    pub(crate) fn threads_mut(&mut self) -> impl Iterator<Item = &mut TimelineThread> {
        self.threads.values_mut()
    }

    pub fn thread_count(&self) -> usize {
        self.threads.len()
    }

    pub fn slice_count(&self) -> usize {
        self.threads.values().map(|t| t.slices().len()).sum()
    }
}

impl TimelineEntity for TimelineProcess {
    fn user_friendly_name(&self) -> String {
        self.pid.to_string()
    }

    fn user_friendly_details(&self) -> String {
        format!("pid: {}", self.pid)
    }
}

// Identity is the pid; thread contents do not participate in equality.
impl PartialEq for TimelineProcess {
    fn eq(&self, other: &Self) -> bool {
        self.pid == other.pid
    }
}

impl Eq for TimelineProcess {}

impl PartialOrd for TimelineProcess {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimelineProcess {
    fn cmp(&self, other: &Self) -> Ordering {
        Self::compare(self, other)
    }
}
