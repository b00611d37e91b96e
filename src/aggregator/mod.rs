//! Alignment and aggregation of usage data.
//!
//! This module transforms fetched series into:
//! - A dense, time-aligned matrix (aligner)
//! - A bucketed matrix with minor groups merged into `Others` (bucketer)
//! - Capacity totals and latest-value snapshots (capacity)
//! - Stacked and bar panels for the dashboard (panels)

pub mod aligner;
pub mod bucketer;
pub mod capacity;
pub mod panels;

// Re-export main types and functions
pub use aligner::{align, check_group_names, grid_tolerance, reindex};
pub use bucketer::{bucket, bucket_values, merge_groups, select_small_groups, stack_order};
pub use capacity::{select_last, CapacityRecord, CapacitySnapshot};
pub use panels::{bar_panel, stacked_panel, Bar, BarOptions, BarPanel, Panel, StackedPanel, StackedSeries};
