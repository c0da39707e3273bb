//! Linux perf text importer.
//!
//! Drives one import run: builds one instance of every registered parser
//! module, dispatches each record to the handler registered for its event
//! name, and collects per-record problems without ever aborting the scan.

use super::result::ImportResult;
use crate::model::TimelineModel;
use crate::parser::handlers::{EventHandlerRegistry, ImportContext};
use crate::parser::line::{parse_lines, TraceRecord};
use crate::parser::registry::{ParserModule, ParserRegistry};
use crate::utils::error::{ErrorSink, ImportErrorKind, ImporterError};
use log::{debug, info};

/// Lifecycle of an importer; there are no transitions back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportState {
    /// Parser modules not built yet
    Uninitialized,
    /// Records are being dispatched one at a time
    Scanning,
    /// The model has been handed out; the importer cannot be reused
    Done,
}

/// Imports one trace into a [`TimelineModel`]
///
/// An importer performs a single import run. Create a new one for every
/// trace; the parser registry can be shared between them.
pub struct Importer<'a> {
    parsers: &'a ParserRegistry,
    state: ImportState,
    handlers: EventHandlerRegistry,
    modules: Vec<Box<dyn ParserModule>>,
    model: TimelineModel,
    errors: ErrorSink,
    records: usize,
}

impl<'a> Importer<'a> {
    pub fn new(parsers: &'a ParserRegistry) -> Self {
        Self {
            parsers,
            state: ImportState::Uninitialized,
            handlers: EventHandlerRegistry::new(),
            modules: Vec::new(),
            model: TimelineModel::new(),
            errors: ErrorSink::new(),
            records: 0,
        }
    }

    pub fn state(&self) -> ImportState {
        self.state
    }

    /// Import already tokenized records
    ///
    /// **Public** - entry point when a collaborator did the line splitting
    ///
    /// Record positions in reported errors are 1-based indexes into `records`.
    ///
    /// # Errors
    /// * `ImporterError::AlreadyImported` - this importer already ran
    /// * `ImporterError::NoParsersRegistered` - the registry is empty
    /// * `ImporterError::NoHandlersRegistered` - a module registered nothing
    pub fn import_records<I>(&mut self, records: I) -> Result<ImportResult, ImporterError>
    where
        I: IntoIterator<Item = TraceRecord>,
    {
        self.begin()?;
        for (index, record) in records.into_iter().enumerate() {
            self.dispatch(index + 1, &record);
        }
        Ok(self.finish())
    }

    /// Tokenize and import perf text
    ///
    /// **Public** - main entry point for text traces
    ///
    /// Lines that cannot be tokenized are recorded as `MalformedLine` errors;
    /// positions are 1-based line numbers.
    ///
    /// # Errors
    /// Same as [`Importer::import_records`].
    pub fn import_text(&mut self, text: &str) -> Result<ImportResult, ImporterError> {
        self.begin()?;
        for (line_number, parsed) in parse_lines(text) {
            match parsed {
                Ok(record) => self.dispatch(line_number, &record),
                Err(e) => {
                    self.errors.set_position(Some(line_number), None);
                    self.errors.report(ImportErrorKind::MalformedLine, e.to_string());
                }
            }
        }
        Ok(self.finish())
    }

    /// Move from `Uninitialized` to `Scanning`
    ///
    /// **Private** - builds one instance of every registered parser module
    fn begin(&mut self) -> Result<(), ImporterError> {
        if self.state != ImportState::Uninitialized {
            return Err(ImporterError::AlreadyImported);
        }

        if self.parsers.is_empty() {
            return Err(ImporterError::NoParsersRegistered);
        }

        for descriptor in self.parsers.subtype_constructors() {
            let before = self.handlers.registration_count();
            let module = (descriptor.construct)(&mut self.handlers);
            if self.handlers.registration_count() == before {
                self.state = ImportState::Done;
                return Err(ImporterError::NoHandlersRegistered {
                    module: descriptor.name,
                });
            }
            debug!("Created parser module '{}'", module.name());
            self.modules.push(module);
        }

        debug!(
            "{} parser modules handling {} event types",
            self.modules.len(),
            self.handlers.len()
        );
        self.state = ImportState::Scanning;
        Ok(())
    }

    /// Hand one record to its handler
    ///
    /// **Private** - never fails; problems go to the error sink
    fn dispatch(&mut self, position: usize, record: &TraceRecord) {
        self.records += 1;
        self.model.update_bounds(record.timestamp);
        self.errors
            .set_position(Some(position), Some(record.event_name.as_str()));

        let Some(handler) = self.handlers.lookup(&record.event_name) else {
            self.errors.report(
                ImportErrorKind::UnrecognizedEventType,
                format!("Unrecognized event type '{}'", record.event_name),
            );
            return;
        };

        let mut ctx = ImportContext {
            model: &mut self.model,
            errors: &mut self.errors,
        };
        let understood = handler(
            &mut ctx,
            &record.event_name,
            record.cpu,
            record.timestamp,
            &record.fields,
        );

        if !understood {
            self.errors.report(
                ImportErrorKind::HandlerRejected,
                format!(
                    "Failed to parse '{}' event: {}",
                    record.event_name, record.fields.details
                ),
            );
        }
    }

    /// Finalize modules and hand out the model
    ///
    /// **Private** - moves from `Scanning` to `Done`
    fn finish(&mut self) -> ImportResult {
        self.errors.set_position(None, None);

        let mut ctx = ImportContext {
            model: &mut self.model,
            errors: &mut self.errors,
        };
        for module in &self.modules {
            module.finalize(&mut ctx);
        }

        // handlers hold module state; release it with the modules
        self.modules.clear();
        self.handlers = EventHandlerRegistry::new();
        self.state = ImportState::Done;

        let result = ImportResult {
            model: std::mem::take(&mut self.model),
            errors: std::mem::take(&mut self.errors).into_errors(),
            records: self.records,
        };

        info!(
            "Imported {} records into {} processes on {} cpus ({} import errors)",
            result.records,
            result.model.process_count(),
            result.model.cpus().count(),
            result.errors.len()
        );
        result
    }
}

/// Import perf text with the built-in parser modules
///
/// **Public** - convenience wrapper for the common case
pub fn import_trace(text: &str) -> Result<ImportResult, ImporterError> {
    let parsers = ParserRegistry::with_builtin_parsers();
    Importer::new(&parsers).import_text(text)
}
