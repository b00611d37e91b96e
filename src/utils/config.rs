//! Configuration and constants for the dashboard.
//!
//! Built-in defaults describe the Flatiron cluster wall. A TOML file can
//! override any of them; missing keys keep their default.

use super::error::ConfigError;
use crate::palette::is_hex_color;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::time::Duration;

/// Default timeout for Prometheus requests
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Current dashboard output schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Name of the synthetic group that collects small contributors
pub const OTHERS_GROUP: &str = "Others";

/// Names that a real metric group must never use
pub const RESERVED_GROUP_NAMES: &[&str] = &[OTHERS_GROUP, "total", "timestamps"];

/// Default share of the grand total below which groups are bucketed
pub const DEFAULT_THRESHOLD: f64 = 0.05;

/// Value substituted for a missing observation
pub const DEFAULT_FILL_VALUE: f64 = 0.0;

/// Dashboard layout and presentation settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Cluster name -> Prometheus base URL
    pub clusters: BTreeMap<String, String>,

    /// Lowercase group name -> `#RRGGBB`
    pub fixed_colors: BTreeMap<String, String>,

    /// Node types left out of CPU bar panels
    pub hide_cpu: BTreeSet<String>,

    /// GPU types left out of GPU bar panels
    pub hide_gpu: BTreeSet<String>,

    /// Lowercase names of the clusters that get a GPU bar panel
    pub gpu_clusters: BTreeSet<String>,

    /// Display labels for long group names
    pub nicknames: BTreeMap<String, String>,

    /// Bucketing threshold for stacked panels
    pub threshold: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let clusters = [
            ("popeye", "http://popeye-prometheus.flatironinstitute.org:80"),
            ("rusty", "http://prometheus.flatironinstitute.org:80"),
        ];
        let fixed_colors = [
            ("cca", "#CE3232"),
            ("ccb", "#81AD4A"),
            ("ccm", "#F6862D"),
            ("ccn", "#007F9D"),
            ("ccq", "#845B8E"),
            ("scc", "#8F8F8F"),
            ("flatiron", "#537EBA"),
        ];
        let nicknames = [
            ("a100-sxm4-80gb", "a100-80gb"),
            ("a100-sxm4-40gb", "a100-40gb"),
        ];

        Self {
            clusters: to_owned_map(&clusters),
            fixed_colors: to_owned_map(&fixed_colors),
            hide_cpu: ["eval", "gpu", "gpuxl", "mem"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            hide_gpu: std::iter::once("v100-sxm2-32gb".to_string()).collect(),
            gpu_clusters: std::iter::once("rusty".to_string()).collect(),
            nicknames: to_owned_map(&nicknames),
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl DashboardConfig {
    /// Check colors and threshold
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_threshold(self.threshold)?;

        for (group, color) in &self.fixed_colors {
            if !is_hex_color(color) {
                return Err(ConfigError::InvalidColor {
                    group: group.clone(),
                    color: color.clone(),
                });
            }
        }

        Ok(())
    }

    /// Whether `cluster` gets a GPU bar panel, case-insensitive
    pub fn has_gpus(&self, cluster: &str) -> bool {
        self.gpu_clusters.contains(&cluster.to_lowercase())
    }
}

/// Load a dashboard config from a TOML file
///
/// # Errors
/// * `ConfigError::Io` - file cannot be read
/// * `ConfigError::Toml` - file is not valid TOML for this schema
/// * `ConfigError::InvalidColor` / `ConfigError::InvalidThreshold` - bad values
///
/// # Example
/// ```ignore
/// let config = load_config("wall.toml")?;
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<DashboardConfig, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    let config: DashboardConfig = toml::from_str(&contents)?;
    config.validate()?;
    Ok(config)
}

/// A bucketing threshold is a fraction strictly between 0 and 1
pub fn validate_threshold(threshold: f64) -> Result<(), ConfigError> {
    if threshold > 0.0 && threshold < 1.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidThreshold(threshold))
    }
}

fn to_owned_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
