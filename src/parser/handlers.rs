//! Event handler registry.
//!
//! Maps an event-type name to the function that interprets it. Marker events
//! are keyed as `tracing_mark_write:<tag>` so one text channel can carry many
//! logical event types. The registry only stores handlers; the importer
//! invokes them.

use super::line::EventFields;
use crate::model::TimelineModel;
use crate::utils::config::marker_event_key;
use crate::utils::error::ErrorSink;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Mutable state a handler may touch while processing one event
pub struct ImportContext<'a> {
    pub model: &'a mut TimelineModel,
    pub errors: &'a mut ErrorSink,
}

/// Handler signature: `(ctx, event_name, cpu, timestamp_ms, fields) -> understood`
///
/// Returning `false` makes the importer record a generic rejection for the
/// event. Handlers that already reported a specific diagnostic may return
/// `true` to avoid the generic message.
pub type HandlerFn = dyn Fn(&mut ImportContext<'_>, &str, u32, f64, &EventFields) -> bool;

/// Shared handle to a registered handler
pub type EventHandler = Rc<HandlerFn>;

/// Event-type name to handler mapping for one import run
#[derive(Default)]
pub struct EventHandlerRegistry {
    handlers: HashMap<String, EventHandler>,
    registrations: usize,
}

impl EventHandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for an event type
    ///
    /// A later registration for the same name replaces the earlier one.
    pub fn register<F>(&mut self, event_name: impl Into<String>, handler: F)
    where
        F: Fn(&mut ImportContext<'_>, &str, u32, f64, &EventFields) -> bool + 'static,
    {
        let event_name = event_name.into();
        self.registrations += 1;
        if self.handlers.insert(event_name.clone(), Rc::new(handler)).is_some() {
            log::debug!("Replacing handler for '{}'", event_name);
        }
    }

    /// Register a handler for a `tracing_mark_write:<tag>` marker event
    pub fn register_marker<F>(&mut self, tag: &str, handler: F)
    where
        F: Fn(&mut ImportContext<'_>, &str, u32, f64, &EventFields) -> bool + 'static,
    {
        self.register(marker_event_key(tag), handler);
    }

    /// Find the handler for an event type
    pub fn lookup(&self, event_name: &str) -> Option<EventHandler> {
        self.handlers.get(event_name).cloned()
    }

    pub fn contains(&self, event_name: &str) -> bool {
        self.handlers.contains_key(event_name)
    }

    /// Number of distinct event types with a handler
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Total `register` calls, overwrites included
    pub fn registration_count(&self) -> usize {
        self.registrations
    }

    /// Registered event names, sorted
    pub fn event_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for EventHandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHandlerRegistry")
            .field("events", &self.event_names())
            .field("registrations", &self.registrations)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn invoke(registry: &EventHandlerRegistry, name: &str) -> Option<bool> {
        let handler = registry.lookup(name)?;
        let mut model = TimelineModel::new();
        let mut errors = ErrorSink::new();
        let mut ctx = ImportContext {
            model: &mut model,
            errors: &mut errors,
        };
        Some(handler(&mut ctx, name, 0, 0.0, &EventFields::default()))
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = EventHandlerRegistry::new();
        registry.register("sched_switch", |_, _, _, _, _| false);
        registry.register("sched_switch", |_, _, _, _, _| true);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.registration_count(), 2);
        assert_eq!(invoke(&registry, "sched_switch"), Some(true));
    }

    #[test]
    fn test_lookup_is_stable() {
        let mut registry = EventHandlerRegistry::new();
        registry.register("foo", |_, _, _, _, _| true);

        let first = registry.lookup("foo").unwrap();
        let second = registry.lookup("foo").unwrap();
        assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_lookup_missing() {
        let registry = EventHandlerRegistry::new();
        assert!(registry.lookup("nope").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_marker_keys() {
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);

        let mut registry = EventHandlerRegistry::new();
        registry.register_marker("trace_event_clock_sync", move |_, _, _, _, _| {
            counter.set(counter.get() + 1);
            true
        });

        assert!(registry.contains("tracing_mark_write:trace_event_clock_sync"));
        assert_eq!(
            invoke(&registry, "tracing_mark_write:trace_event_clock_sync"),
            Some(true)
        );
        assert_eq!(invoke(&registry, "tracing_mark_write:other_tag"), None);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_event_names_sorted() {
        let mut registry = EventHandlerRegistry::new();
        registry.register("b", |_, _, _, _, _| true);
        registry.register("a", |_, _, _, _, _| true);
        assert_eq!(registry.event_names(), vec!["a", "b"]);
    }
}
