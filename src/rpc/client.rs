//! HTTP client for the Prometheus query API.

use crate::utils::config::DEFAULT_QUERY_TIMEOUT;
use crate::utils::error::QueryError;
use chrono::{DateTime, Utc};
use log::{debug, info};
use reqwest::blocking::Client;

/// Client bound to one Prometheus server
pub struct PromClient {
    client: Client,
    base_url: String,
}

impl PromClient {
    /// Create a new client for `base_url` (scheme, host and port)
    pub fn new(base_url: impl Into<String>) -> Result<Self, QueryError> {
        let client = Client::builder()
            .timeout(DEFAULT_QUERY_TIMEOUT)
            .build()
            .map_err(QueryError::RequestFailed)?;

        Ok(Self {
            client,
            base_url: normalize_base_url(&base_url.into()),
        })
    }

    /// Evaluate `query` over `[start, end]` every `step` (e.g. `1h`)
    pub fn query_range(
        &self,
        query: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        step: &str,
    ) -> Result<serde_json::Value, QueryError> {
        info!("Range query {} .. {} step {}: {}", start, end, step, query);

        let params = [
            ("query", query.to_string()),
            ("start", start.timestamp().to_string()),
            ("end", end.timestamp().to_string()),
            ("step", step.to_string()),
        ];
        self.get("/api/v1/query_range", &params)
    }

    /// Evaluate `query` at `time`
    pub fn query_instant(&self, query: &str, time: DateTime<Utc>) -> Result<serde_json::Value, QueryError> {
        info!("Instant query at {}: {}", time, query);

        let params = [
            ("query", query.to_string()),
            ("time", time.timestamp().to_string()),
        ];
        self.get("/api/v1/query", &params)
    }

    fn get(&self, path: &str, params: &[(&str, String)]) -> Result<serde_json::Value, QueryError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {} {:?}", url, params);

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .map_err(QueryError::RequestFailed)?;

        // Check HTTP status
        let status = response.status();
        if !status.is_success() {
            return Err(QueryError::HttpStatus {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }

        response.json().map_err(QueryError::RequestFailed)
    }
}

/// Strip trailing slashes so paths can be appended
fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
