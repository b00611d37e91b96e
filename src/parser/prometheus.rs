//! Decode Prometheus responses into series sets.
//!
//! Each result series is keyed by one label (the grouping dimension). Series
//! that lack the label are skipped; series sharing a label value are merged.

use super::schema::{Sample, SeriesSet};
use crate::rpc::types::{PromData, PromResponse, PromSeries, RawSample};
use crate::utils::error::ParseError;
use log::debug;

const MATRIX: &str = "matrix";
const VECTOR: &str = "vector";

/// Decode a `query_range` response
///
/// **Public** - main entry point for range data
///
/// # Arguments
/// * `raw` - Response body
/// * `label` - Grouping label, e.g. `account` or `nodes`
///
/// # Errors
/// * `ParseError::JsonError` - body does not match the API envelope
/// * `ParseError::Unsuccessful` - `status` is not `success`
/// * `ParseError::UnexpectedResultType` - not a matrix
/// * `ParseError::MalformedSample` - timestamp is not finite or value is not a number
///
/// Samples whose value is `NaN` or infinite are dropped.
pub fn parse_matrix(raw: &serde_json::Value, label: &str) -> Result<SeriesSet, ParseError> {
    let data = parse_envelope(raw, MATRIX)?;
    collect_series(data.result, label, |series| series.values)
}

/// Decode an instant `query` response
///
/// **Public** - each group gets a single sample
pub fn parse_vector(raw: &serde_json::Value, label: &str) -> Result<SeriesSet, ParseError> {
    let data = parse_envelope(raw, VECTOR)?;
    collect_series(data.result, label, |series| series.value.into_iter().collect())
}

fn parse_envelope(raw: &serde_json::Value, expected: &str) -> Result<PromData, ParseError> {
    let response: PromResponse = serde_json::from_value(raw.clone())?;

    if response.status != "success" {
        let reason = match (response.error_type, response.error) {
            (Some(kind), Some(msg)) => format!("{}: {}", kind, msg),
            (_, Some(msg)) => msg,
            _ => format!("status '{}'", response.status),
        };
        return Err(ParseError::Unsuccessful(reason));
    }

    let data = response
        .data
        .ok_or_else(|| ParseError::Unsuccessful("missing data member".to_string()))?;

    if data.result_type != expected {
        return Err(ParseError::UnexpectedResultType {
            expected: expected.to_string(),
            actual: data.result_type,
        });
    }

    Ok(data)
}

fn collect_series<F>(results: Vec<PromSeries>, label: &str, samples_of: F) -> Result<SeriesSet, ParseError>
where
    F: Fn(PromSeries) -> Vec<RawSample>,
{
    let mut set = SeriesSet::new();

    for mut series in results {
        let Some(group) = series.metric.remove(label) else {
            debug!("Skipping series without '{}' label: {:?}", label, series.metric);
            continue;
        };

        let samples = samples_of(series)
            .iter()
            .map(to_sample)
            .collect::<Result<Vec<_>, _>>()?;
        let skipped = samples.iter().filter(|s| s.is_none()).count();
        if skipped > 0 {
            debug!("Skipping {} non-finite samples of '{}'", skipped, group);
        }

        set.entry(group).or_default().extend(samples.into_iter().flatten());
    }

    debug!("Decoded {} groups by '{}'", set.len(), label);
    Ok(set)
}

/// `None` for `NaN` and `±Inf` values, which Prometheus emits for e.g. a
/// division by zero
fn to_sample(raw: &RawSample) -> Result<Option<Sample>, ParseError> {
    let (ts, value) = raw;

    if !ts.is_finite() {
        return Err(ParseError::MalformedSample(format!("timestamp {}", ts)));
    }

    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| ParseError::MalformedSample(format!("value '{}'", value)))?;

    Ok(value
        .is_finite()
        .then(|| Sample::new(ts.trunc() as i64, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_sample_truncates_timestamp() {
        let sample = to_sample(&(1_700_000_000.75, "12".to_string())).unwrap();
        assert_eq!(sample, Some(Sample::new(1_700_000_000, 12.0)));
    }

    #[test]
    fn test_to_sample_rejects_garbage() {
        assert!(to_sample(&(1.0, "twelve".to_string())).is_err());
        assert!(to_sample(&(f64::INFINITY, "1".to_string())).is_err());
    }

    #[test]
    fn test_to_sample_skips_non_finite_value() {
        assert_eq!(to_sample(&(1.0, "NaN".to_string())).unwrap(), None);
        assert_eq!(to_sample(&(1.0, "+Inf".to_string())).unwrap(), None);
        assert_eq!(to_sample(&(1.0, "-Inf".to_string())).unwrap(), None);
    }

    #[test]
    fn test_error_status() {
        let raw = json!({
            "status": "error",
            "errorType": "bad_data",
            "error": "parse error at char 5"
        });
        let err = parse_matrix(&raw, "account").unwrap_err();
        assert!(err.to_string().contains("bad_data"));
    }

    #[test]
    fn test_wrong_result_type() {
        let raw = json!({
            "status": "success",
            "data": { "resultType": "vector", "result": [] }
        });
        assert!(matches!(
            parse_matrix(&raw, "account"),
            Err(ParseError::UnexpectedResultType { .. })
        ));
    }
}
