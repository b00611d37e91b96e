//! Viswall
//!
//! Cluster usage data for the machine-room video wall: Slurm metrics are
//! fetched from Prometheus, aligned onto a common time grid, and minor
//! accounts are bucketed into `Others` before the panels are written out.
//!
//! The two pure stages can be used on their own:
//!
//! ```ignore
//! use viswall::aggregator::{align, bucket};
//!
//! let dense = align(&series, 0.0);
//! let wall = bucket(&dense, 0.05);
//! ```

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod palette;
pub mod parser;
pub mod rpc;
pub mod utils;
