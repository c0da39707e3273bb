//! Built-in parser modules, one per trace event family.

pub mod clock_sync;
pub mod sched;
pub mod workqueue;

pub use clock_sync::ClockSyncParser;
pub use sched::{SchedParser, SchedSwitch, SchedWakeup};
pub use workqueue::WorkqueueParser;

use super::registry::ParserRegistry;

/// Register every built-in module, in a fixed order
pub fn register_builtin(parsers: &mut ParserRegistry) {
    sched::register(parsers);
    workqueue::register(parsers);
    clock_sync::register(parsers);
}
