//! Dashboard document written to disk.
//!
//! Schema is versioned to allow future evolution.

use crate::aggregator::Panel;
use crate::utils::config::SCHEMA_VERSION;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Top-level document: every panel of one wall refresh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    /// Schema version for compatibility checking
    pub version: String,

    /// When the data was fetched
    pub generated_at: DateTime<Utc>,

    /// Look-back window in days
    pub days: u32,

    /// Prometheus step
    pub step: String,

    /// Bucketing threshold applied to stacked panels
    pub threshold: f64,

    pub panels: Vec<Panel>,
}

impl Dashboard {
    pub fn new(days: u32, step: impl Into<String>, threshold: f64, panels: Vec<Panel>) -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            generated_at: Utc::now(),
            days,
            step: step.into(),
            threshold,
            panels,
        }
    }

    /// Panels that ended up without data
    pub fn empty_panels(&self) -> usize {
        self.panels.iter().filter(|p| !p.has_data()).count()
    }
}
