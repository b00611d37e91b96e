//! Data model shared by the aligner, the bucketer and the output writers.
//!
//! Timestamps always live in their own field, never as a key next to group
//! names, so a group can never shadow them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Seconds since the Unix epoch
pub type Timestamp = i64;

/// One observation of a group
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: Timestamp,
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp: Timestamp, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Sparse observations keyed by group name, as handed over by the query layer
pub type SeriesSet = BTreeMap<String, Vec<Sample>>;

/// Group name -> equal-length value sequence
pub type GroupValues = BTreeMap<String, Vec<f64>>;

/// Time-aligned matrix: every group has one value per timestamp
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DenseMatrix {
    /// Strictly increasing
    pub timestamps: Vec<Timestamp>,

    /// Each sequence has `timestamps.len()` entries
    pub values: GroupValues,
}

impl DenseMatrix {
    /// "No data"
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty() && self.values.is_empty()
    }

    pub fn group_count(&self) -> usize {
        self.values.len()
    }

    /// Sum over all groups at index `i`
    pub fn column_total(&self, i: usize) -> f64 {
        column_total(&self.values, i)
    }
}

/// A dense matrix after small groups were merged into `Others`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BucketedMatrix {
    pub timestamps: Vec<Timestamp>,
    pub values: GroupValues,

    /// Original groups folded into `Others`, smallest first
    pub merged: Vec<String>,
}

impl BucketedMatrix {
    pub fn is_bucketed(&self) -> bool {
        !self.merged.is_empty()
    }

    pub fn column_total(&self, i: usize) -> f64 {
        column_total(&self.values, i)
    }
}

fn column_total(values: &GroupValues, i: usize) -> f64 {
    values.values().filter_map(|seq| seq.get(i)).sum()
}
