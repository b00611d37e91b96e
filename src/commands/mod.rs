//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod align;
pub mod models;
pub mod snapshot;
pub mod utils;

// Re-export main command functions
pub use align::execute_align;
pub use models::{AlignArgs, SnapshotArgs};
pub use snapshot::{build_dashboard, execute_snapshot, validate_args};
pub use utils::{display_schema, display_version, validate_dashboard_file};
