//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.
//!
//! The aligner and bucketer never return errors: empty input, all-zero data
//! and degenerate thresholds all degrade to a no-op.

use thiserror::Error;

/// Errors that can occur while talking to Prometheus
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Prometheus returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("No Prometheus endpoint configured for cluster '{0}'")]
    UnknownCluster(String),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Errors that can occur while decoding a Prometheus response
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Prometheus reported an error: {0}")]
    Unsuccessful(String),

    #[error("Unexpected result type: expected {expected}, got {actual}")]
    UnexpectedResultType { expected: String, actual: String },

    #[error("Malformed sample: {0}")]
    MalformedSample(String),
}

/// A real metric group collides with a name the dashboard reserves for itself
#[derive(Error, Debug, PartialEq, Eq)]
pub enum GroupNameError {
    #[error("group name '{0}' is reserved and cannot be used for a metric group")]
    Reserved(String),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

/// Errors that can occur while loading a dashboard config
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid color '{color}' for group '{group}'")]
    InvalidColor { group: String, color: String },

    #[error("Threshold must be within (0, 1), got {0}")]
    InvalidThreshold(f64),
}
