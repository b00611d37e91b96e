//! Sparse-to-dense time alignment.
//!
//! Groups report samples at different instants (nodes and accounts come and
//! go). Alignment puts every group on the sorted union of all timestamps and
//! substitutes an explicit fill value wherever a group has no observation.
//! Nothing is interpolated.

use crate::parser::schema::{DenseMatrix, GroupValues, SeriesSet, Timestamp};
use crate::utils::config::RESERVED_GROUP_NAMES;
use crate::utils::error::GroupNameError;
use log::debug;
use std::collections::{BTreeSet, HashMap};

/// Align a sparse series set onto a shared, strictly increasing time grid
///
/// **Public** - main entry point for alignment
///
/// # Arguments
/// * `series` - Group name -> samples, in any order
/// * `fill_value` - Value used where a group lacks a sample
///
/// # Returns
/// A dense matrix. Empty input yields an empty matrix ("no data").
///
/// # Algorithm
/// 1. Collect the distinct timestamps of every group
/// 2. Sort them ascending
/// 3. Index each group's samples by timestamp (last write wins)
/// 4. Emit one value per timestamp, falling back to `fill_value`
pub fn align(series: &SeriesSet, fill_value: f64) -> DenseMatrix {
    let grid: BTreeSet<Timestamp> = series
        .values()
        .flat_map(|samples| samples.iter().map(|s| s.timestamp))
        .collect();
    let timestamps: Vec<Timestamp> = grid.into_iter().collect();

    let values: GroupValues = series
        .iter()
        .map(|(group, samples)| {
            let lookup: HashMap<Timestamp, f64> =
                samples.iter().map(|s| (s.timestamp, s.value)).collect();
            (group.clone(), fill_row(&timestamps, &lookup, fill_value))
        })
        .collect();

    debug!(
        "Aligned {} groups onto {} timestamps",
        values.len(),
        timestamps.len()
    );

    DenseMatrix { timestamps, values }
}

/// Re-project a dense matrix onto another time grid
///
/// **Public** - used to lay a capacity series under a usage chart whose
/// grid may differ slightly
///
/// # Arguments
/// * `matrix` - Source matrix, timestamps strictly increasing
/// * `target` - Grid to project onto
/// * `tolerance` - Largest distance in seconds at which a source timestamp
///   still counts as the target one; 0 means exact matches only
/// * `fill_value` - Value for target timestamps with no source within reach
///
/// Each target timestamp takes the nearest source timestamp (the earlier one
/// on a tie). Source timestamps that no target picks are dropped.
pub fn reindex(matrix: &DenseMatrix, target: &[Timestamp], tolerance: u64, fill_value: f64) -> DenseMatrix {
    let positions: Vec<Option<usize>> = target
        .iter()
        .map(|ts| nearest(&matrix.timestamps, *ts, tolerance))
        .collect();

    let values = matrix
        .values
        .iter()
        .map(|(group, row)| {
            let projected = positions
                .iter()
                .map(|pos| pos.and_then(|i| row.get(i).copied()).unwrap_or(fill_value))
                .collect();
            (group.clone(), projected)
        })
        .collect();

    DenseMatrix {
        timestamps: target.to_vec(),
        values,
    }
}

/// Half the smallest spacing of a grid; 0 for fewer than two points
///
/// **Public** - the widest `reindex` tolerance that cannot map one source
/// point onto two neighbouring target points
pub fn grid_tolerance(timestamps: &[Timestamp]) -> u64 {
    timestamps
        .windows(2)
        .map(|w| w[1].abs_diff(w[0]))
        .min()
        .map_or(0, |gap| gap.saturating_sub(1) / 2)
}

/// Reject group names the dashboard reserves for synthetic entries
///
/// **Public** - callers run this before aligning data destined for bucketing
pub fn check_group_names(series: &SeriesSet) -> Result<(), GroupNameError> {
    match series
        .keys()
        .find(|name| RESERVED_GROUP_NAMES.contains(&name.as_str()))
    {
        Some(name) => Err(GroupNameError::Reserved(name.clone())),
        None => Ok(()),
    }
}

fn fill_row(timestamps: &[Timestamp], lookup: &HashMap<Timestamp, f64>, fill_value: f64) -> Vec<f64> {
    timestamps
        .iter()
        .map(|ts| lookup.get(ts).copied().unwrap_or(fill_value))
        .collect()
}

fn nearest(sorted: &[Timestamp], ts: Timestamp, tolerance: u64) -> Option<usize> {
    let idx = sorted.partition_point(|&t| t < ts);

    [idx.checked_sub(1), Some(idx)]
        .into_iter()
        .flatten()
        .filter_map(|i| sorted.get(i).map(|t| (i, t.abs_diff(ts))))
        .filter(|&(_, distance)| distance <= tolerance)
        .min_by_key(|&(i, distance)| (distance, i))
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::schema::Sample;

    fn series(entries: &[(&str, Vec<(i64, f64)>)]) -> SeriesSet {
        entries
            .iter()
            .map(|(name, samples)| {
                (
                    name.to_string(),
                    samples.iter().map(|&(t, v)| Sample::new(t, v)).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_align_fills_missing() {
        let input = series(&[("A", vec![(0, 5.0), (1, 7.0)]), ("B", vec![(1, 3.0)])]);
        let matrix = align(&input, 0.0);

        assert_eq!(matrix.timestamps, vec![0, 1]);
        assert_eq!(matrix.values["A"], vec![5.0, 7.0]);
        assert_eq!(matrix.values["B"], vec![0.0, 3.0]);
    }

    #[test]
    fn test_align_unordered_samples() {
        let input = series(&[("A", vec![(30, 3.0), (10, 1.0), (20, 2.0)])]);
        let matrix = align(&input, 0.0);

        assert_eq!(matrix.timestamps, vec![10, 20, 30]);
        assert_eq!(matrix.values["A"], vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_align_duplicate_timestamp_last_wins() {
        let input = series(&[("A", vec![(5, 1.0), (5, 9.0)])]);
        let matrix = align(&input, 0.0);

        assert_eq!(matrix.timestamps, vec![5]);
        assert_eq!(matrix.values["A"], vec![9.0]);
    }

    #[test]
    fn test_align_empty() {
        let matrix = align(&SeriesSet::new(), 0.0);
        assert!(matrix.is_empty());
    }

    #[test]
    fn test_align_group_without_samples_is_kept() {
        let input = series(&[("A", vec![(0, 1.0)]), ("idle", vec![])]);
        let matrix = align(&input, -1.0);

        assert_eq!(matrix.values["idle"], vec![-1.0]);
    }

    #[test]
    fn test_reindex_drops_and_fills() {
        let input = series(&[("A", vec![(0, 1.0), (10, 2.0), (20, 3.0)])]);
        let matrix = align(&input, 0.0);
        let projected = reindex(&matrix, &[10, 15, 20], 0, 0.0);

        assert_eq!(projected.timestamps, vec![10, 15, 20]);
        assert_eq!(projected.values["A"], vec![2.0, 0.0, 3.0]);
    }

    #[test]
    fn test_reindex_offset_grid() {
        let input = series(&[("genoa", vec![(1001, 1000.0), (4601, 1200.0)])]);
        let matrix = align(&input, 0.0);

        let exact = reindex(&matrix, &[1000, 4600], 0, 0.0);
        assert_eq!(exact.values["genoa"], vec![0.0, 0.0]);

        let near = reindex(&matrix, &[1000, 4600], grid_tolerance(&[1000, 4600]), 0.0);
        assert_eq!(near.values["genoa"], vec![1000.0, 1200.0]);
    }

    #[test]
    fn test_reindex_tie_takes_earlier() {
        let input = series(&[("A", vec![(0, 1.0), (10, 2.0)])]);
        let projected = reindex(&align(&input, 0.0), &[5], 5, -1.0);
        assert_eq!(projected.values["A"], vec![1.0]);
    }

    #[test]
    fn test_grid_tolerance() {
        assert_eq!(grid_tolerance(&[]), 0);
        assert_eq!(grid_tolerance(&[42]), 0);
        assert_eq!(grid_tolerance(&[0, 3600, 7200]), 1799);
        assert_eq!(grid_tolerance(&[0, 60, 3600]), 29);
    }

    #[test]
    fn test_check_group_names() {
        assert!(check_group_names(&series(&[("cca", vec![])])).is_ok());
        assert_eq!(
            check_group_names(&series(&[("cca", vec![]), ("total", vec![])])),
            Err(GroupNameError::Reserved("total".to_string()))
        );
    }
}
