//! Types for the Prometheus HTTP API (`/api/v1/query`, `/api/v1/query_range`).
//!
//! Only the fields the dashboard reads are modelled; everything else in the
//! envelope is ignored.

use serde::Deserialize;
use std::collections::BTreeMap;

/// `[<unix seconds>, "<value>"]`
pub type RawSample = (f64, String);

/// Response envelope
#[derive(Debug, Deserialize)]
pub struct PromResponse {
    pub status: String,

    #[serde(default)]
    pub data: Option<PromData>,

    #[serde(default, rename = "errorType")]
    pub error_type: Option<String>,

    #[serde(default)]
    pub error: Option<String>,
}

/// `data` member of a successful response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromData {
    /// `matrix` for range queries, `vector` for instant queries
    pub result_type: String,

    #[serde(default)]
    pub result: Vec<PromSeries>,
}

/// One labelled series
#[derive(Debug, Deserialize)]
pub struct PromSeries {
    #[serde(default)]
    pub metric: BTreeMap<String, String>,

    /// Range query samples
    #[serde(default)]
    pub values: Vec<RawSample>,

    /// Instant query sample
    #[serde(default)]
    pub value: Option<RawSample>,
}
