//! Threads and the timed spans recorded on them.

use serde::Serialize;
use std::collections::BTreeMap;

/// Thread identifier as reported by the kernel
pub type Tid = u32;

/// A timed span on a thread or CPU
///
/// Timestamps are milliseconds. A slice without a duration is still open.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub title: String,
    pub start: f64,
    pub duration: Option<f64>,

    /// Extra key/value details recorded by the parser that created the slice
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub args: BTreeMap<String, String>,
}

impl Slice {
    pub fn new(title: impl Into<String>, start: f64) -> Self {
        Self {
            title: title.into(),
            start,
            duration: None,
            args: BTreeMap::new(),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.args.insert(key.into(), value.to_string());
        self
    }

    pub fn is_open(&self) -> bool {
        self.duration.is_none()
    }

    pub fn end(&self) -> Option<f64> {
        self.duration.map(|d| self.start + d)
    }

    /// Close the slice at `ts`; an end before the start clamps to zero length
    pub(crate) fn close(&mut self, ts: f64) {
        self.duration = Some((ts - self.start).max(0.0));
    }
}

/// A thread owned by exactly one [`super::TimelineProcess`]
#[derive(Debug, Clone)]
pub struct TimelineThread {
    tid: Tid,
    name: Option<String>,
    slices: Vec<Slice>,
    // indexes into `slices`, innermost last
    open: Vec<usize>,
}

impl TimelineThread {
    pub fn new(tid: Tid) -> Self {
        Self {
            tid,
            name: None,
            slices: Vec::new(),
            open: Vec::new(),
        }
    }

    pub fn tid(&self) -> Tid {
        self.tid
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Name the thread unless it already has one
    pub fn set_name_if_missing(&mut self, name: &str) {
        if self.name.is_none() && !name.is_empty() {
            self.name = Some(name.to_string());
        }
    }

    pub fn slices(&self) -> &[Slice] {
        &self.slices
    }

    pub fn open_slice_count(&self) -> usize {
        self.open.len()
    }

    /// Open a nested slice; its start is the slice's own timestamp
    pub fn push_slice(&mut self, slice: Slice) {
        self.slices.push(slice);
        self.open.push(self.slices.len() - 1);
    }

    /// Open a nested slice starting at `ts`
    pub fn begin_slice(&mut self, title: impl Into<String>, ts: f64) {
        self.push_slice(Slice::new(title, ts));
    }

    /// Close the innermost open slice, returning it
    ///
    /// Returns `None` when nothing is open.
    pub fn end_slice(&mut self, ts: f64) -> Option<&Slice> {
        let index = self.open.pop()?;
        let slice = &mut self.slices[index];
        slice.close(ts);
        Some(&*slice)
    }

    /// Close every still-open slice at `ts`
    pub fn close_open_slices(&mut self, ts: f64) -> usize {
        let count = self.open.len();
        while self.end_slice(ts).is_some() {}
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_slices_close_innermost_first() {
        let mut thread = TimelineThread::new(10);
        thread.begin_slice("outer", 1.0);
        thread.begin_slice("inner", 2.0);

        let inner = thread.end_slice(3.0).unwrap();
        assert_eq!(inner.title, "inner");
        assert_eq!(inner.duration, Some(1.0));

        let outer = thread.end_slice(5.0).unwrap();
        assert_eq!(outer.title, "outer");
        assert_eq!(outer.end(), Some(5.0));

        assert!(thread.end_slice(6.0).is_none());
    }

    #[test]
    fn test_close_open_slices() {
        let mut thread = TimelineThread::new(1);
        thread.begin_slice("a", 0.0);
        thread.begin_slice("b", 1.0);
        assert_eq!(thread.close_open_slices(4.0), 2);
        assert!(thread.slices().iter().all(|s| !s.is_open()));
    }

    #[test]
    fn test_slice_args() {
        let mut thread = TimelineThread::new(3);
        thread.push_slice(Slice::new("work", 1.0).with_arg("work_struct", "c4ee9a44"));
        assert_eq!(
            thread.slices()[0].args.get("work_struct").map(String::as_str),
            Some("c4ee9a44")
        );
    }

    #[test]
    fn test_end_before_start_clamps() {
        let mut slice = Slice::new("x", 10.0);
        slice.close(5.0);
        assert_eq!(slice.duration, Some(0.0));
    }

    #[test]
    fn test_name_is_sticky() {
        let mut thread = TimelineThread::new(1);
        thread.set_name_if_missing("");
        assert_eq!(thread.name(), None);
        thread.set_name_if_missing("kworker/0:1");
        thread.set_name_if_missing("other");
        assert_eq!(thread.name(), Some("kworker/0:1"));
    }
}
