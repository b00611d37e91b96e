//! Significance bucketing: fold minor groups into a single `Others` group.
//!
//! Membership is decided once for the whole time range from each group's
//! total magnitude, so a group never flips in and out of `Others` over time.
//! The per-timestamp total is conserved exactly.

use crate::parser::schema::{BucketedMatrix, DenseMatrix, GroupValues};
use crate::utils::config::OTHERS_GROUP;
use log::debug;
use std::cmp::Ordering;

/// Bucket the small groups of an aligned matrix
///
/// **Public** - main entry point for bucketing
///
/// # Arguments
/// * `matrix` - Aligned usage matrix
/// * `threshold` - Maximum share of the grand total the merged groups may hold
///
/// # Returns
/// The same grid with the selected groups replaced by `Others`. When nothing
/// qualifies the values are returned unchanged and `merged` is empty.
pub fn bucket(matrix: &DenseMatrix, threshold: f64) -> BucketedMatrix {
    let (values, merged) = bucket_values(&matrix.values, threshold);

    BucketedMatrix {
        timestamps: matrix.timestamps.clone(),
        values,
        merged,
    }
}

/// Bucket any mapping of group -> equal-length sequence
///
/// **Public** - for callers that hold values without a time grid
///
/// # Returns
/// `(values, merged)` where `merged` lists the folded groups, smallest first
pub fn bucket_values(values: &GroupValues, threshold: f64) -> (GroupValues, Vec<String>) {
    let small = select_small_groups(values, threshold);

    if small.is_empty() {
        debug!("No group below {:.3} of the total, bucketing skipped", threshold);
        return (values.clone(), small);
    }

    debug!("Merging {} of {} groups into {}", small.len(), values.len(), OTHERS_GROUP);
    (merge_groups(values, &small), small)
}

/// Pick the smallest groups whose combined share stays under `threshold`
///
/// **Public** - exposes the membership decision on its own
///
/// # Algorithm
/// 1. Total magnitude per group (sum over the whole sequence)
/// 2. Sort ascending by magnitude, then by name
/// 3. Accumulate while `running / grand_total < threshold`, stop at the
///    first group that would reach it
///
/// A non-positive or non-finite grand total selects nothing.
pub fn select_small_groups(values: &GroupValues, threshold: f64) -> Vec<String> {
    let mut magnitudes: Vec<(&str, f64)> = values
        .iter()
        .map(|(group, seq)| (group.as_str(), seq.iter().sum::<f64>()))
        .collect();

    let grand_total: f64 = magnitudes.iter().map(|(_, m)| m).sum();
    if !grand_total.is_finite() || grand_total <= 0.0 {
        return Vec::new();
    }

    magnitudes.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(b.0)));

    let mut running = 0.0;
    let mut small = Vec::new();
    for (group, magnitude) in magnitudes {
        running += magnitude;
        if running / grand_total < threshold {
            small.push(group.to_string());
        } else {
            break;
        }
    }

    small
}

/// Replace `small` groups by their index-wise sum under `Others`
///
/// **Public** - step 3 of bucketing
///
/// An unselected input group already named `Others` absorbs the merged values
/// instead of being overwritten.
pub fn merge_groups(values: &GroupValues, small: &[String]) -> GroupValues {
    if small.is_empty() {
        return values.clone();
    }

    let mut result = values.clone();
    let mut others: Vec<f64> = Vec::new();

    for group in small {
        if let Some(seq) = result.remove(group) {
            add_into(&mut others, &seq);
        }
    }

    if let Some(existing) = result.remove(OTHERS_GROUP) {
        add_into(&mut others, &existing);
    }
    result.insert(OTHERS_GROUP.to_string(), others);

    result
}

/// Presentation order for stacking: latest value descending, then by name
///
/// **Public** - `Others` sorts like any other group
pub fn stack_order(values: &GroupValues) -> Vec<String> {
    let mut keys: Vec<(&String, f64)> = values
        .iter()
        .map(|(group, seq)| (group, seq.last().copied().unwrap_or(0.0)))
        .collect();

    keys.sort_by(|a, b| match b.1.total_cmp(&a.1) {
        Ordering::Equal => a.0.cmp(b.0),
        other => other,
    });

    keys.into_iter().map(|(group, _)| group.clone()).collect()
}

fn add_into(acc: &mut Vec<f64>, seq: &[f64]) {
    if acc.len() < seq.len() {
        acc.resize(seq.len(), 0.0);
    }
    for (slot, value) in acc.iter_mut().zip(seq) {
        *slot += value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(entries: &[(&str, Vec<f64>)]) -> GroupValues {
        entries
            .iter()
            .map(|(name, seq)| (name.to_string(), seq.clone()))
            .collect()
    }

    #[test]
    fn test_single_small_group() {
        let input = values(&[("A", vec![10.0]), ("B", vec![90.0])]);
        let (out, merged) = bucket_values(&input, 0.2);

        assert_eq!(merged, vec!["A".to_string()]);
        assert_eq!(out["Others"], vec![10.0]);
        assert_eq!(out["B"], vec![90.0]);
        assert!(!out.contains_key("A"));
    }

    #[test]
    fn test_two_small_groups() {
        let input = values(&[("A", vec![1.0]), ("B", vec![1.0]), ("C", vec![98.0])]);
        let (out, merged) = bucket_values(&input, 0.05);

        assert_eq!(merged, vec!["A".to_string(), "B".to_string()]);
        assert_eq!(out["Others"], vec![2.0]);
        assert_eq!(out["C"], vec![98.0]);
    }

    #[test]
    fn test_boundary_is_exclusive() {
        // 10 / 100 == 0.1 exactly
        let input = values(&[("A", vec![10.0]), ("B", vec![90.0])]);
        let (out, merged) = bucket_values(&input, 0.1);

        assert!(merged.is_empty());
        assert_eq!(out, input);
    }

    #[test]
    fn test_stops_at_first_violation() {
        let input = values(&[("A", vec![1.0]), ("B", vec![5.0]), ("C", vec![94.0])]);
        let small = select_small_groups(&input, 0.05);
        assert_eq!(small, vec!["A".to_string()]);
    }

    #[test]
    fn test_tie_broken_by_name() {
        let input = values(&[("zeta", vec![1.0]), ("alpha", vec![1.0]), ("big", vec![98.5])]);
        let small = select_small_groups(&input, 0.012);
        assert_eq!(small, vec!["alpha".to_string()]);
    }

    #[test]
    fn test_all_zero_is_noop() {
        let input = values(&[("A", vec![0.0, 0.0]), ("B", vec![0.0, 0.0])]);
        let (out, merged) = bucket_values(&input, 0.5);
        assert!(merged.is_empty());
        assert_eq!(out, input);
    }

    #[test]
    fn test_empty_is_noop() {
        let (out, merged) = bucket_values(&GroupValues::new(), 0.5);
        assert!(out.is_empty());
        assert!(merged.is_empty());
    }

    #[test]
    fn test_existing_others_absorbs_merge() {
        let input = values(&[("A", vec![1.0, 1.0]), ("Others", vec![20.0, 20.0]), ("B", vec![80.0, 80.0])]);
        let (out, merged) = bucket_values(&input, 0.05);

        assert_eq!(merged, vec!["A".to_string()]);
        assert_eq!(out["Others"], vec![21.0, 21.0]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_nan_threshold_is_noop() {
        let input = values(&[("A", vec![1.0]), ("B", vec![99.0])]);
        let (_, merged) = bucket_values(&input, f64::NAN);
        assert!(merged.is_empty());
    }

    #[test]
    fn test_stack_order_by_latest() {
        let input = values(&[("A", vec![100.0, 1.0]), ("B", vec![0.0, 5.0]), ("C", vec![3.0, 5.0])]);
        assert_eq!(stack_order(&input), vec!["B", "C", "A"]);
    }
}
