//! Output writers for dashboard data.
//!
//! This module handles writing data to disk:
//! - Dashboard documents (every panel of one refresh)
//! - Aligned/bucketed matrices from offline runs

pub mod dashboard;
pub mod json;

// Re-export main functions
pub use dashboard::Dashboard;
pub use json::{read_dashboard, validate_path, write_dashboard, write_matrix};
