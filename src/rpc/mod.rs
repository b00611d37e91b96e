//! Prometheus access: HTTP client, PromQL builders and the series source.

pub mod client;
pub mod queries;
pub mod source;
pub mod types;

pub use client::PromClient;
pub use queries::{capacity_query, usage_query, Resource};
pub use source::{PromSource, QueryWindow, UsageSource};
