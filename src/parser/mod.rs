//! Data model and Prometheus response decoding.
//!
//! This module handles:
//! - The series/matrix types shared by every stage
//! - Turning raw Prometheus JSON into a `SeriesSet`

pub mod prometheus;
pub mod schema;

// Re-export main types
pub use prometheus::{parse_matrix, parse_vector};
pub use schema::{BucketedMatrix, DenseMatrix, GroupValues, Sample, SeriesSet, Timestamp};
