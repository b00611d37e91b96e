//! Assemble analysis-ready panels from aligned usage and capacity.
//!
//! A stacked panel is a timeline (optionally bucketed) with the capacity
//! line underneath; a bar panel is a snapshot of the latest values.

use super::aligner::{grid_tolerance, reindex};
use super::bucketer::{bucket, stack_order};
use super::capacity::{select_last, CapacityRecord};
use crate::palette::ColorRegistry;
use crate::parser::schema::{BucketedMatrix, DenseMatrix, Timestamp};
use crate::utils::config::DEFAULT_FILL_VALUE;
use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One chart on the wall
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Panel {
    Stacked(StackedPanel),
    Bar(BarPanel),
    NoData { title: String },
}

/// Stacked-area timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackedPanel {
    pub title: String,

    pub timestamps: Vec<DateTime<Utc>>,

    /// Bottom of the stack first
    pub series: Vec<StackedSeries>,

    /// Total capacity at each timestamp
    pub capacity: Vec<f64>,

    /// Upper bound of the value axis: the capacity peak
    pub y_limit: f64,

    /// Groups folded into `Others`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub merged: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackedSeries {
    pub group: String,
    pub color: String,
    pub values: Vec<f64>,
}

/// Latest usage against latest capacity, one bar per group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarPanel {
    pub title: String,
    pub bars: Vec<Bar>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub group: String,
    pub label: String,
    pub color: String,
    pub value: f64,
    pub capacity: f64,
}

/// Filtering and labelling for bar panels
#[derive(Debug, Clone, Copy)]
pub struct BarOptions<'a> {
    pub hide: &'a BTreeSet<String>,
    pub nicknames: &'a BTreeMap<String, String>,
}

impl Panel {
    pub fn title(&self) -> &str {
        match self {
            Panel::Stacked(p) => &p.title,
            Panel::Bar(p) => &p.title,
            Panel::NoData { title } => title,
        }
    }

    pub fn has_data(&self) -> bool {
        !matches!(self, Panel::NoData { .. })
    }

    /// One-line description for terminal output
    pub fn summary(&self) -> String {
        match self {
            Panel::Stacked(p) => {
                let latest: f64 = p.series.iter().filter_map(|s| s.values.last()).sum();
                format!(
                    "{}: {} groups over {} points, latest {:.0} of {:.0}{}",
                    p.title,
                    p.series.len(),
                    p.timestamps.len(),
                    latest,
                    p.capacity.last().copied().unwrap_or(0.0),
                    if p.merged.is_empty() {
                        String::new()
                    } else {
                        format!(" ({} merged into Others)", p.merged.len())
                    }
                )
            }
            Panel::Bar(p) => {
                let used: f64 = p.bars.iter().map(|b| b.value).sum();
                let capacity: f64 = p.bars.iter().map(|b| b.capacity).sum();
                format!("{}: {} bars, {:.0} of {:.0}", p.title, p.bars.len(), used, capacity)
            }
            Panel::NoData { title } => format!("{}: no data", title),
        }
    }
}

/// Build a stacked timeline panel
///
/// **Public** - used for per-account usage views
///
/// # Arguments
/// * `title` - Panel title
/// * `usage` - Aligned usage matrix
/// * `capacity` - Capacity record; its total is re-gridded onto `usage`
/// * `threshold` - Bucket small groups into `Others` when set
/// * `colors` - Session color registry
pub fn stacked_panel(
    title: &str,
    usage: &DenseMatrix,
    capacity: &CapacityRecord,
    threshold: Option<f64>,
    colors: &ColorRegistry,
) -> Panel {
    if usage.timestamps.is_empty() {
        return Panel::NoData { title: title.to_string() };
    }

    let bucketed = match threshold {
        Some(t) => bucket(usage, t),
        None => BucketedMatrix {
            timestamps: usage.timestamps.clone(),
            values: usage.values.clone(),
            merged: Vec::new(),
        },
    };

    let series = stack_order(&bucketed.values)
        .into_iter()
        .map(|group| StackedSeries {
            color: colors.get(&group).to_string(),
            values: bucketed.values[&group].clone(),
            group,
        })
        .collect();

    let capacity_line = CapacityRecord::from_matrix(reindex(
        &capacity.as_matrix(),
        &bucketed.timestamps,
        grid_tolerance(&bucketed.timestamps),
        DEFAULT_FILL_VALUE,
    ));

    debug!("Stacked panel '{}' with {} merged groups", title, bucketed.merged.len());

    Panel::Stacked(StackedPanel {
        title: title.to_string(),
        timestamps: bucketed.timestamps.iter().map(|ts| to_datetime(*ts)).collect(),
        series,
        y_limit: capacity_line.peak_total(),
        capacity: capacity_line.total,
        merged: bucketed.merged,
    })
}

/// Build a snapshot bar panel
///
/// **Public** - used for per-node-type CPU and GPU views
///
/// One bar per capacity group, sorted by name. Groups without positive
/// capacity and hidden groups are dropped; missing usage reads as 0.
pub fn bar_panel(
    title: &str,
    usage: &DenseMatrix,
    capacity: &CapacityRecord,
    options: BarOptions<'_>,
    colors: &ColorRegistry,
) -> Panel {
    let latest_usage = select_last(&usage.values);
    let latest_capacity = capacity.latest();

    let bars: Vec<Bar> = latest_capacity
        .groups
        .iter()
        .filter(|(group, cap)| **cap > 0.0 && !options.hide.contains(*group))
        .map(|(group, cap)| Bar {
            group: group.clone(),
            label: options
                .nicknames
                .get(group)
                .cloned()
                .unwrap_or_else(|| group.clone()),
            color: colors.get(group).to_string(),
            value: latest_usage.get(group).copied().unwrap_or(0.0),
            capacity: *cap,
        })
        .collect();

    if bars.is_empty() {
        return Panel::NoData { title: title.to_string() };
    }

    Panel::Bar(BarPanel {
        title: title.to_string(),
        bars,
    })
}

fn to_datetime(ts: Timestamp) -> DateTime<Utc> {
    DateTime::from_timestamp(ts, 0).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::schema::GroupValues;

    fn matrix(timestamps: Vec<Timestamp>, rows: &[(&str, Vec<f64>)]) -> DenseMatrix {
        let values: GroupValues = rows
            .iter()
            .map(|(name, seq)| (name.to_string(), seq.clone()))
            .collect();
        DenseMatrix { timestamps, values }
    }

    #[test]
    fn test_stacked_panel_buckets_and_orders() {
        let usage = matrix(
            vec![0, 60],
            &[("cca", vec![40.0, 50.0]), ("ccb", vec![50.0, 40.0]), ("tiny", vec![1.0, 1.0])],
        );
        let capacity = CapacityRecord::from_matrix(matrix(vec![0, 60], &[("genoa", vec![100.0, 100.0])]));
        let colors = ColorRegistry::build(["cca", "ccb", "Others"], &BTreeMap::new());

        let panel = stacked_panel("Usage", &usage, &capacity, Some(0.05), &colors);
        let Panel::Stacked(p) = panel else {
            panic!("expected stacked panel");
        };

        let order: Vec<&str> = p.series.iter().map(|s| s.group.as_str()).collect();
        assert_eq!(order, vec!["cca", "ccb", "Others"]);
        assert_eq!(p.merged, vec!["tiny".to_string()]);
        assert_eq!(p.capacity, vec![100.0, 100.0]);
        assert_eq!(p.y_limit, 100.0);
        assert_eq!(p.timestamps[1].timestamp(), 60);
    }

    #[test]
    fn test_stacked_panel_capacity_on_shifted_grid() {
        let usage = matrix(vec![1000, 4600], &[("cca", vec![10.0, 20.0])]);
        let capacity = CapacityRecord::from_matrix(matrix(vec![1001, 4601], &[("genoa", vec![1000.0, 1100.0])]));

        let Panel::Stacked(p) = stacked_panel("Usage", &usage, &capacity, None, &ColorRegistry::default()) else {
            panic!("expected stacked panel");
        };
        assert_eq!(p.capacity, vec![1000.0, 1100.0]);
        assert_eq!(p.y_limit, 1100.0);
    }

    #[test]
    fn test_stacked_panel_no_data() {
        let colors = ColorRegistry::default();
        let panel = stacked_panel("Usage", &DenseMatrix::default(), &CapacityRecord::default(), None, &colors);
        assert!(!panel.has_data());
        assert_eq!(panel.summary(), "Usage: no data");
    }

    #[test]
    fn test_bar_panel_filters() {
        let usage = matrix(
            vec![0],
            &[("genoa", vec![10.0]), ("mem", vec![3.0]), ("retired", vec![0.0]), ("a100-sxm4-80gb", vec![4.0])],
        );
        let capacity = CapacityRecord::from_matrix(matrix(
            vec![0],
            &[("genoa", vec![20.0]), ("mem", vec![8.0]), ("retired", vec![0.0]), ("a100-sxm4-80gb", vec![8.0])],
        ));
        let hide: BTreeSet<String> = std::iter::once("mem".to_string()).collect();
        let nicknames: BTreeMap<String, String> =
            std::iter::once(("a100-sxm4-80gb".to_string(), "a100-80gb".to_string())).collect();
        let options = BarOptions { hide: &hide, nicknames: &nicknames };

        let panel = bar_panel("CPUs", &usage, &capacity, options, &ColorRegistry::default());
        let Panel::Bar(p) = panel else {
            panic!("expected bar panel");
        };

        let labels: Vec<&str> = p.bars.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["a100-80gb", "genoa"]);
        assert_eq!(p.bars[1].value, 10.0);
        assert_eq!(p.bars[1].capacity, 20.0);
    }

    #[test]
    fn test_bar_panel_idle_group_reads_zero() {
        let usage = matrix(vec![0], &[("genoa", vec![10.0])]);
        let capacity = CapacityRecord::from_matrix(matrix(vec![0], &[("genoa", vec![20.0]), ("rome", vec![8.0])]));
        let empty = BTreeSet::new();
        let nicknames = BTreeMap::new();
        let options = BarOptions { hide: &empty, nicknames: &nicknames };

        let Panel::Bar(p) = bar_panel("CPUs", &usage, &capacity, options, &ColorRegistry::default()) else {
            panic!("expected bar panel");
        };
        assert_eq!(p.bars.len(), 2);
        assert_eq!(p.bars[1].group, "rome");
        assert_eq!(p.bars[1].value, 0.0);
    }
}
