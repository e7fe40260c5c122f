//! Output module for reports and exports
//!
//! This module handles:
//! - Column coverage statistics of a harvested table
//! - Aggregates for charting (most common values, per-year series)
//! - Markdown reports of harvests and probe runs
//! - JSON export of tables

pub mod aggregate;
mod markdown;
pub mod stats;

pub use aggregate::{column_terms, most_common, top_n, yearly_counts, yearly_counts_for};
pub use markdown::{format_harvest_report, format_probe_report, write_markdown};
pub use stats::{format_column_summary, summarize_column, summarize_table, ColumnSummary};

use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Writes any serializable table (harvest rows, probe results) as pretty JSON
pub fn write_json<T: Serialize + ?Sized>(value: &T, output_path: &Path) -> OutputResult<()> {
    let mut writer = BufWriter::new(File::create(output_path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
