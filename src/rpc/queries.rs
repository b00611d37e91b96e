//! PromQL for the Slurm exporter metrics.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Resource counted by the Slurm exporter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Cpus,
    Bytes,
    Gpus,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Cpus => "cpus",
            Resource::Bytes => "bytes",
            Resource::Gpus => "gpus",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resources allocated to running jobs, summed per `grouping` label
pub fn usage_query(grouping: &str, resource: Resource) -> String {
    format!(
        r#"sum by({}) (slurm_job_{}{{state="running",job="slurm"}})"#,
        grouping, resource
    )
}

/// Resources on nodes that are neither drained nor down
///
/// Without a grouping the whole cluster is summed into one series.
pub fn capacity_query(grouping: Option<&str>, resource: Resource) -> String {
    let by = grouping.map(|g| format!("by({}) ", g)).unwrap_or_default();
    format!(
        r#"sum {}(slurm_node_{}{{state!="drain",state!="down"}})"#,
        by, resource
    )
}
