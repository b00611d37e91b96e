//! JSON output writer.
//!
//! Writes dashboards and aligned matrices to JSON files with proper formatting.

use super::dashboard::Dashboard;
use crate::parser::schema::BucketedMatrix;
use crate::utils::error::OutputError;
use log::{debug, info};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Write a dashboard to a JSON file
///
/// **Public** - main entry point for dashboard output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
///
/// # Example
/// ```ignore
/// let dashboard = Dashboard::new(7, "1h", 0.05, panels);
/// write_dashboard(&dashboard, "usage.json")?;
/// ```
pub fn write_dashboard(dashboard: &Dashboard, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    write_json(dashboard, output_path.as_ref())
}

/// Write an aligned (and possibly bucketed) matrix to a JSON file
///
/// **Public** - output of the offline `align` command
pub fn write_matrix(matrix: &BucketedMatrix, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    write_json(matrix, output_path.as_ref())
}

/// Read a dashboard from a JSON file
///
/// **Public** - useful for validation and testing
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error (reusing WriteFailed for I/O)
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_dashboard(input_path: impl AsRef<Path>) -> Result<Dashboard, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading dashboard from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;

    let dashboard: Dashboard =
        serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    debug!(
        "Dashboard loaded: version {}, {} panels",
        dashboard.version,
        dashboard.panels.len()
    );

    Ok(dashboard)
}

/// Validate that output path is writable
///
/// **Public** - also used by argument validation
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    // Check if we're trying to overwrite a directory
    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

fn write_json<T: Serialize>(value: &T, output_path: &Path) -> Result<(), OutputError> {
    info!("Writing JSON to: {}", output_path.display());

    validate_path(output_path)?;

    // Create parent directories if needed
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

    serde_json::to_writer_pretty(writer, value).map_err(OutputError::SerializationFailed)?;

    info!(
        "JSON written successfully ({} bytes)",
        std::fs::metadata(output_path).map(|m| m.len()).unwrap_or(0)
    );

    Ok(())
}
