//! Align command implementation.
//!
//! Works offline on a saved `query_range` response:
//! 1. Decodes the series, grouped by one label
//! 2. Aligns them onto a dense grid
//! 3. Optionally buckets small groups into `Others`
//! 4. Writes the matrix JSON

use super::models::AlignArgs;
use crate::aggregator::{align, bucket, check_group_names};
use crate::output::write_matrix;
use crate::parser::{parse_matrix, BucketedMatrix};
use anyhow::{Context, Result};
use log::info;
use std::fs::File;
use std::io::BufReader;

/// Execute the align command
///
/// **Public** - main entry point called from main.rs
pub fn execute_align(args: AlignArgs) -> Result<BucketedMatrix> {
    let file = File::open(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;
    let raw: serde_json::Value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("{} is not JSON", args.input.display()))?;

    let series = parse_matrix(&raw, &args.group_by).context("Failed to decode query_range response")?;
    info!("Decoded {} groups by '{}'", series.len(), args.group_by);

    let dense = align(&series, args.fill_value);
    let matrix = match args.threshold {
        Some(threshold) => {
            check_group_names(&series).context("Cannot bucket this data")?;
            bucket(&dense, threshold)
        }
        None => BucketedMatrix {
            timestamps: dense.timestamps,
            values: dense.values,
            merged: Vec::new(),
        },
    };

    if matrix.is_bucketed() {
        info!("Merged into Others: {}", matrix.merged.join(", "));
    }

    write_matrix(&matrix, &args.output).context("Failed to write matrix JSON")?;
    info!(
        "✓ {} groups x {} timestamps written to: {}",
        matrix.values.len(),
        matrix.timestamps.len(),
        args.output.display()
    );

    Ok(matrix)
}
