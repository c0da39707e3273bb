//! Parser module registry.
//!
//! Each parser module understands one family of trace events, e.g. the
//! `sched:*` kernel events. A module is described by a [`ParserDescriptor`]
//! whose constructor registers the module's handlers with an
//! [`EventHandlerRegistry`]. The importer builds one instance of every
//! registered module per import run.
//!
//! Registering a module:
//!
//! ```ignore
//! pub fn register(parsers: &mut ParserRegistry) {
//!     parsers.register_subtype(ParserDescriptor::new("workqueue", WorkqueueParser::create));
//! }
//! ```

use super::handlers::{EventHandlerRegistry, ImportContext};
use super::modules;
use std::fmt;

/// A parser module instance living for one import run
///
/// Handlers themselves are closures registered at construction time;
/// the instance is kept so it can finish up once scanning is done.
pub trait ParserModule {
    fn name(&self) -> &'static str;

    /// Called once after the last record has been dispatched
    fn finalize(&self, _ctx: &mut ImportContext<'_>) {}
}

/// Builds a module and registers its handlers
pub type ParserConstructor = fn(&mut EventHandlerRegistry) -> Box<dyn ParserModule>;

/// A registered parser module constructor
#[derive(Clone, Copy)]
pub struct ParserDescriptor {
    pub name: &'static str,
    pub construct: ParserConstructor,
}

impl ParserDescriptor {
    pub fn new(name: &'static str, construct: ParserConstructor) -> Self {
        Self { name, construct }
    }
}

impl fmt::Debug for ParserDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserDescriptor")
            .field("name", &self.name)
            .finish()
    }
}

/// Ordered list of known parser modules
///
/// Append-only; registering a module twice yields two instances per import.
#[derive(Debug, Default, Clone)]
pub struct ParserRegistry {
    constructors: Vec<ParserDescriptor>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every parser module shipped with this crate
    pub fn with_builtin_parsers() -> Self {
        let mut registry = Self::new();
        modules::register_builtin(&mut registry);
        registry
    }

    pub fn register_subtype(&mut self, descriptor: ParserDescriptor) {
        log::debug!("Registering parser module '{}'", descriptor.name);
        self.constructors.push(descriptor);
    }

    /// Constructors in registration order, duplicates included
    pub fn subtype_constructors(&self) -> &[ParserDescriptor] {
        &self.constructors
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}
