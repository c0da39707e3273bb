//! Output JSON schema for import summaries.
//!
//! This module defines the structure of JSON files we write to disk.
//! Schema is versioned to allow future evolution.

use crate::importer::ImportResult;
use crate::model::{Pid, TimelineEntity, TimelineProcess};
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::ImportError;
use serde::{Deserialize, Serialize};

/// Top-level summary structure written to JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSummary {
    /// Schema version for compatibility checking
    pub version: String,

    /// Trace file the summary was built from, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Number of records dispatched to handlers
    pub records: usize,

    /// Processes in ascending pid order
    pub processes: Vec<ProcessSummary>,

    pub cpu_count: usize,

    /// Offset from trace clock to the parent clock, in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clock_sync_offset_ms: Option<f64>,

    /// Every import error, in the order reported
    pub errors: Vec<ImportError>,

    /// Timestamp when summary was generated
    pub generated_at: String,
}

/// Per-process line of the summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessSummary {
    pub pid: Pid,
    pub name: String,
    pub details: String,
    pub threads: usize,
    pub slices: usize,
}

impl ProcessSummary {
    pub fn from_process(process: &TimelineProcess) -> Self {
        Self {
            pid: process.pid(),
            name: process.user_friendly_name(),
            details: process.user_friendly_details(),
            threads: process.thread_count(),
            slices: process.slice_count(),
        }
    }
}

/// Convert an import result to the output summary format
///
/// **Public** - used by commands to create final output
pub fn to_summary(result: &ImportResult, source: Option<&str>) -> ImportSummary {
    use chrono::Utc;

    ImportSummary {
        version: SCHEMA_VERSION.to_string(),
        source: source.map(str::to_string),
        records: result.records,
        processes: result
            .model
            .processes()
            .map(ProcessSummary::from_process)
            .collect(),
        cpu_count: result.model.cpus().count(),
        clock_sync_offset_ms: result.model.clock_sync_offset(),
        errors: result.errors.clone(),
        generated_at: Utc::now().to_rfc3339(),
    }
}
