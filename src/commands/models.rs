use crate::utils::config::{DEFAULT_FILL_VALUE, DEFAULT_THRESHOLD};
use std::path::PathBuf;

/// Arguments for the snapshot command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct SnapshotArgs {
    /// Days to look back for timelines
    pub days: u32,

    /// Prometheus step between points
    pub step: String,

    /// Bucketing threshold; falls back to the config value
    pub threshold: Option<f64>,

    /// Optional TOML dashboard config
    pub config: Option<PathBuf>,

    /// Output path for the dashboard JSON
    pub output: PathBuf,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for SnapshotArgs {
    fn default() -> Self {
        Self {
            days: 7,
            step: "1h".to_string(),
            threshold: None,
            config: None,
            output: PathBuf::from("usage.json"),
            print_summary: false,
        }
    }
}

/// Arguments for the offline align command
#[derive(Debug, Clone)]
pub struct AlignArgs {
    /// Saved `query_range` response
    pub input: PathBuf,

    /// Label to group series by
    pub group_by: String,

    /// Bucket small groups when set
    pub threshold: Option<f64>,

    /// Value for missing samples
    pub fill_value: f64,

    /// Output path for the matrix JSON
    pub output: PathBuf,
}

impl Default for AlignArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from("query_range.json"),
            group_by: "account".to_string(),
            threshold: Some(DEFAULT_THRESHOLD),
            fill_value: DEFAULT_FILL_VALUE,
            output: PathBuf::from("matrix.json"),
        }
    }
}
