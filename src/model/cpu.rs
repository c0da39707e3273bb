//! Per-CPU run slices.

use super::thread::Slice;

/// The slices of threads scheduled on one CPU
///
/// At most one slice is running at a time.
#[derive(Debug, Clone)]
pub struct Cpu {
    number: u32,
    slices: Vec<Slice>,
    running: Option<usize>,
}

impl Cpu {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            slices: Vec::new(),
            running: None,
        }
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn slices(&self) -> &[Slice] {
        &self.slices
    }

    pub fn running(&self) -> Option<&Slice> {
        self.running.map(|i| &self.slices[i])
    }

    /// Stop whatever is running at `ts`
    pub fn close_running(&mut self, ts: f64) -> bool {
        match self.running.take() {
            Some(index) => {
                self.slices[index].close(ts);
                true
            }
            None => false,
        }
    }

    /// Switch the CPU to a new slice, closing the running one at the new start
    pub fn switch_to(&mut self, slice: Slice) {
        self.close_running(slice.start);
        self.slices.push(slice);
        self.running = Some(self.slices.len() - 1);
    }
}
