use crate::output::read_summary;
use crate::parser::ParserRegistry;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::Result;
use std::path::Path;

/// Validate a summary JSON file
pub fn validate_summary_file(file_path: &Path) -> Result<()> {
    println!("Validating summary: {}", file_path.display());

    let summary = read_summary(file_path)?;

    println!("✓ Valid summary JSON");
    println!("  Version: {}", summary.version);
    if let Some(source) = &summary.source {
        println!("  Source: {}", source);
    }
    println!("  Records: {}", summary.records);
    println!("  Processes: {}", summary.processes.len());
    println!("  CPUs: {}", summary.cpu_count);
    println!("  Import errors: {}", summary.errors.len());

    Ok(())
}

/// List registered parser modules and the events they handle
pub fn display_parsers(parsers: &ParserRegistry) {
    println!("Registered parser modules ({}):", parsers.len());

    for descriptor in parsers.subtype_constructors() {
        let mut handlers = crate::parser::EventHandlerRegistry::new();
        let module = (descriptor.construct)(&mut handlers);
        println!("  {}", module.name());
        for event in handlers.event_names() {
            println!("    {}", event);
        }
    }
}

/// Display version information
pub fn display_version() {
    println!("perf-import v{}", env!("CARGO_PKG_VERSION"));
    println!("Summary Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Imports linux perf/ftrace text traces into a process timeline model.");
}
