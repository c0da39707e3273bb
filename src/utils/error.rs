//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.
//!
//! Per-record problems found while scanning a trace are not Rust errors at all:
//! they are collected as [`ImportError`] values and handed back next to the model.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Structural failures that stop an import run before or after scanning
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ImporterError {
    #[error("Importer has already completed an import; create a new importer")]
    AlreadyImported,

    #[error("Parser module '{module}' registered no event handlers")]
    NoHandlersRegistered { module: &'static str },

    #[error("No parser modules are registered")]
    NoParsersRegistered,
}

/// Errors that can occur while tokenizing a single trace line
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    #[error("Unrecognized line format: {0}")]
    Malformed(String),

    #[error("Invalid number in trace line: {0}")]
    InvalidNumber(String),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[source] std::io::Error),

    #[error("Failed to read file: {0}")]
    ReadFailed(#[source] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

/// Category of a recorded import problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportErrorKind {
    /// No handler is registered for the event type
    UnrecognizedEventType,
    /// The handler ran and reported failure
    HandlerRejected,
    /// A module-specific message emitted by a handler
    HandlerDiagnostic,
    /// The raw line could not be split into a record
    MalformedLine,
}

impl fmt::Display for ImportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::UnrecognizedEventType => "unrecognized event type",
            Self::HandlerRejected => "handler rejected event",
            Self::HandlerDiagnostic => "handler diagnostic",
            Self::MalformedLine => "malformed line",
        };
        f.write_str(name)
    }
}

/// One non-fatal problem recorded during an import run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportError {
    pub kind: ImportErrorKind,
    pub message: String,

    /// 1-based position of the offending record in the input
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {}: {}: {}", line, self.kind, self.message),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

/// Append-only sink for import errors
///
/// Never fails on its own; records are kept in the order they were reported.
#[derive(Debug, Default, Clone)]
pub struct ErrorSink {
    errors: Vec<ImportError>,
    current_line: Option<usize>,
    current_event: Option<String>,
}

impl ErrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the record position attached to subsequently reported errors
    pub(crate) fn set_position(&mut self, line: Option<usize>, event_name: Option<&str>) {
        self.current_line = line;
        self.current_event = event_name.map(str::to_string);
    }

    /// Record an error of the given kind for the current record
    pub fn report(&mut self, kind: ImportErrorKind, message: impl Into<String>) {
        let error = ImportError {
            kind,
            message: message.into(),
            line: self.current_line,
            event_name: self.current_event.clone(),
        };
        log::warn!("Import error: {}", error);
        self.errors.push(error);
    }

    /// Record a module-specific diagnostic for the current record
    pub fn diagnostic(&mut self, message: impl Into<String>) {
        self.report(ImportErrorKind::HandlerDiagnostic, message);
    }

    pub fn errors(&self) -> &[ImportError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_errors(self) -> Vec<ImportError> {
        self.errors
    }
}
