//! Cluster capacity: per-group sequences plus their index-wise total.

use crate::parser::schema::{DenseMatrix, GroupValues, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Capacity over a time range
///
/// `total` is kept in its own field so no group can be mistaken for it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapacityRecord {
    pub timestamps: Vec<Timestamp>,
    pub groups: GroupValues,
    pub total: Vec<f64>,
}

/// Capacity at the most recent instant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapacitySnapshot {
    pub groups: BTreeMap<String, f64>,
    pub total: f64,
}

impl CapacityRecord {
    /// Build from an aligned capacity matrix
    pub fn from_matrix(matrix: DenseMatrix) -> Self {
        let total = (0..matrix.timestamps.len())
            .map(|i| matrix.column_total(i))
            .collect();

        Self {
            timestamps: matrix.timestamps,
            groups: matrix.values,
            total,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// The latest value of every group
    pub fn latest(&self) -> CapacitySnapshot {
        CapacitySnapshot {
            groups: select_last(&self.groups),
            total: self.total.last().copied().unwrap_or(0.0),
        }
    }

    /// Highest total over the range; 0 when empty
    pub fn peak_total(&self) -> f64 {
        self.total.iter().copied().fold(0.0, f64::max)
    }

    /// Matrix view of the groups, for re-gridding
    pub fn as_matrix(&self) -> DenseMatrix {
        DenseMatrix {
            timestamps: self.timestamps.clone(),
            values: self.groups.clone(),
        }
    }
}

/// Reduce every sequence to its last element
///
/// Empty sequences are skipped.
pub fn select_last(values: &GroupValues) -> BTreeMap<String, f64> {
    values
        .iter()
        .filter_map(|(group, seq)| seq.last().map(|v| (group.clone(), *v)))
        .collect()
}
