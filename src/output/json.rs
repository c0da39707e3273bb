//! JSON summary output writer.
//!
//! Writes ImportSummary structs to JSON files with proper formatting.

use super::schema::ImportSummary;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Write a summary to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Arguments
/// * `summary` - Summary data to write
/// * `output_path` - Path to output JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_summary(
    summary: &ImportSummary,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing summary to: {}", output_path.display());

    validate_output_path(output_path)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, summary).map_err(OutputError::SerializationFailed)?;

    info!(
        "Summary written successfully ({} bytes)",
        calculate_file_size(output_path)
    );

    Ok(())
}

/// Serialize a summary to a pretty JSON string
pub fn summary_to_string(summary: &ImportSummary) -> Result<String, OutputError> {
    serde_json::to_string_pretty(summary).map_err(OutputError::SerializationFailed)
}

/// Validate that output path is writable
///
/// **Private** - internal validation
fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

/// Read a summary from a JSON file
///
/// **Public** - useful for validation and testing
///
/// # Errors
/// * `OutputError::ReadFailed` - File read error
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_summary(input_path: impl AsRef<Path>) -> Result<ImportSummary, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading summary from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::ReadFailed)?;
    let summary: ImportSummary =
        serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    debug!(
        "Summary loaded: version {}, {} processes",
        summary.version,
        summary.processes.len()
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::schema::ProcessSummary;
    use crate::utils::error::{ImportError, ImportErrorKind};
    use tempfile::NamedTempFile;

    fn create_test_summary() -> ImportSummary {
        ImportSummary {
            version: "1.0.0".to_string(),
            source: Some("trace.txt".to_string()),
            records: 3,
            processes: vec![ProcessSummary {
                pid: 12,
                name: "12".to_string(),
                details: "pid: 12".to_string(),
                threads: 1,
                slices: 2,
            }],
            cpu_count: 2,
            clock_sync_offset_ms: None,
            errors: vec![ImportError {
                kind: ImportErrorKind::UnrecognizedEventType,
                message: "Unrecognized event type 'foo'".to_string(),
                line: Some(2),
                event_name: Some("foo".to_string()),
            }],
            generated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_write_and_read_summary() {
        let summary = create_test_summary();
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path();

        write_summary(&summary, path).unwrap();
        let loaded = read_summary(path).unwrap();

        assert_eq!(loaded.version, summary.version);
        assert_eq!(loaded.processes, summary.processes);
        assert_eq!(loaded.errors, summary.errors);
    }

    #[test]
    fn test_summary_to_string_uses_snake_case_kinds() {
        let json = summary_to_string(&create_test_summary()).unwrap();
        assert!(json.contains("\"unrecognized_event_type\""));
        assert!(!json.contains("clock_sync_offset_ms"));
    }

    #[test]
    fn test_validate_output_path_empty() {
        assert!(validate_output_path(Path::new("")).is_err());
    }

    #[test]
    fn test_validate_output_path_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(validate_output_path(temp_dir.path()).is_err());
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested_path = temp_dir.path().join("nested/dirs/summary.json");

        write_summary(&create_test_summary(), &nested_path).unwrap();

        assert!(nested_path.exists());
    }

    #[test]
    fn test_read_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = read_summary(temp_dir.path().join("missing.json"));
        assert!(matches!(result, Err(OutputError::ReadFailed(_))));
    }
}
