//! Trace tokenization and the event dispatch mechanism.
//!
//! This module handles:
//! - Splitting perf text lines into records
//! - Mapping event names to handlers
//! - The registry of parser modules and the built-in modules

pub mod handlers;
pub mod line;
pub mod modules;
pub mod registry;

// Re-export main types
pub use handlers::{EventHandler, EventHandlerRegistry, HandlerFn, ImportContext};
pub use line::{parse_line, parse_lines, EventFields, TraceRecord};
pub use registry::{ParserConstructor, ParserDescriptor, ParserModule, ParserRegistry};
