//! The outcome of one import run.

use crate::model::TimelineModel;
use crate::utils::error::{ImportError, ImportErrorKind};

/// Completed model plus every problem recorded while building it
///
/// Errors are in the order they were reported. A caller decides whether the
/// trace is usable despite them.
#[derive(Debug, Clone)]
pub struct ImportResult {
    pub model: TimelineModel,
    pub errors: Vec<ImportError>,

    /// Number of records dispatched (malformed lines excluded)
    pub records: usize,
}

impl ImportResult {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Count recorded errors of one kind
    pub fn error_count(&self, kind: ImportErrorKind) -> usize {
        self.errors.iter().filter(|e| e.kind == kind).count()
    }

    pub fn errors_of(&self, kind: ImportErrorKind) -> impl Iterator<Item = &ImportError> {
        self.errors.iter().filter(move |e| e.kind == kind)
    }
}
