//! Where the dashboard gets its series from.
//!
//! Transport and decoding failures stop here: they are logged and turned into
//! an empty `SeriesSet`, which the rest of the pipeline renders as "no data".

use super::client::PromClient;
use super::queries::{capacity_query, usage_query, Resource};
use crate::parser::{parse_matrix, parse_vector, SeriesSet};
use crate::utils::config::DashboardConfig;
use crate::utils::error::QueryError;
use chrono::{DateTime, Duration, Utc};
use log::warn;
use std::collections::BTreeMap;

/// Time range and resolution of a request
///
/// `end` is fixed when the window is created. Every query of one dashboard
/// shares the same window, so Prometheus evaluates them all on the same grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryWindow {
    /// Days to look back; 0 asks for the latest values only
    pub days: u32,

    /// Prometheus step, e.g. `1h`
    pub step: String,

    /// Evaluation time of the last point, whole seconds
    pub end: DateTime<Utc>,
}

impl QueryWindow {
    /// Window ending now
    pub fn new(days: u32, step: impl Into<String>) -> Self {
        Self::ending_at(days, step, Utc::now())
    }

    /// Window ending at `end`, truncated to whole seconds
    pub fn ending_at(days: u32, step: impl Into<String>, end: DateTime<Utc>) -> Self {
        Self {
            days,
            step: step.into(),
            end: DateTime::from_timestamp(end.timestamp(), 0).unwrap_or(end),
        }
    }

    /// Latest values only, evaluated at the same `end`
    pub fn latest(&self) -> Self {
        Self {
            days: 0,
            step: String::new(),
            end: self.end,
        }
    }

    pub fn is_instant(&self) -> bool {
        self.days == 0
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.end - Duration::days(i64::from(self.days))
    }
}

/// Supplier of usage and capacity series
pub trait UsageSource {
    /// Resources in use by running jobs, per `grouping` label
    fn usage(&self, cluster: &str, grouping: &str, resource: Resource, window: &QueryWindow) -> SeriesSet;

    /// Resources available on healthy nodes, per `grouping` label
    fn capacity(&self, cluster: &str, grouping: &str, resource: Resource, window: &QueryWindow) -> SeriesSet;
}

/// `UsageSource` backed by one Prometheus server per cluster
pub struct PromSource {
    clients: BTreeMap<String, PromClient>,
}

impl PromSource {
    /// One client per configured cluster
    pub fn new(config: &DashboardConfig) -> Result<Self, QueryError> {
        let clients = config
            .clusters
            .iter()
            .map(|(name, url)| Ok((name.to_lowercase(), PromClient::new(url.clone())?)))
            .collect::<Result<BTreeMap<_, _>, QueryError>>()?;

        Ok(Self { clients })
    }

    fn fetch(&self, cluster: &str, query: &str, label: &str, window: &QueryWindow) -> Result<SeriesSet, QueryError> {
        let client = self
            .clients
            .get(&cluster.to_lowercase())
            .ok_or_else(|| QueryError::UnknownCluster(cluster.to_string()))?;

        if window.is_instant() {
            let raw = client.query_instant(query, window.end)?;
            return Ok(parse_vector(&raw, label)?);
        }

        let raw = client.query_range(query, window.start(), window.end, &window.step)?;
        Ok(parse_matrix(&raw, label)?)
    }

    fn fetch_or_empty(&self, cluster: &str, query: &str, label: &str, window: &QueryWindow) -> SeriesSet {
        self.fetch(cluster, query, label, window).unwrap_or_else(|e| {
            warn!("No data from {} for '{}': {}", cluster, query, e);
            SeriesSet::new()
        })
    }
}

impl UsageSource for PromSource {
    fn usage(&self, cluster: &str, grouping: &str, resource: Resource, window: &QueryWindow) -> SeriesSet {
        self.fetch_or_empty(cluster, &usage_query(grouping, resource), grouping, window)
    }

    fn capacity(&self, cluster: &str, grouping: &str, resource: Resource, window: &QueryWindow) -> SeriesSet {
        self.fetch_or_empty(cluster, &capacity_query(Some(grouping), resource), grouping, window)
    }
}
