use pretty_assertions::assert_eq;
use serde_json::json;
use viswall::parser::{parse_matrix, parse_vector, Sample};
use viswall::utils::ParseError;

#[test]
fn test_parse_matrix_groups_by_label() {
    let raw = json!({
        "status": "success",
        "data": {
            "resultType": "matrix",
            "result": [
                {
                    "metric": { "account": "cca" },
                    "values": [[1700000000, "120"], [1700003600, "130"]]
                },
                {
                    "metric": { "account": "ccb" },
                    "values": [[1700003600, "64"]]
                }
            ]
        }
    });

    let set = parse_matrix(&raw, "account").unwrap();

    assert_eq!(set.len(), 2);
    assert_eq!(
        set["cca"],
        vec![Sample::new(1_700_000_000, 120.0), Sample::new(1_700_003_600, 130.0)]
    );
    assert_eq!(set["ccb"], vec![Sample::new(1_700_003_600, 64.0)]);
}

#[test]
fn test_parse_matrix_skips_unlabelled_series() {
    let raw = json!({
        "status": "success",
        "data": {
            "resultType": "matrix",
            "result": [
                { "metric": {}, "values": [[1, "5"]] },
                { "metric": { "nodes": "genoa" }, "values": [[1, "7"]] }
            ]
        }
    });

    let set = parse_matrix(&raw, "nodes").unwrap();
    assert_eq!(set.keys().collect::<Vec<_>>(), vec!["genoa"]);
}

#[test]
fn test_parse_matrix_merges_duplicate_labels() {
    let raw = json!({
        "status": "success",
        "data": {
            "resultType": "matrix",
            "result": [
                { "metric": { "nodes": "rome", "partition": "a" }, "values": [[1, "1"]] },
                { "metric": { "nodes": "rome", "partition": "b" }, "values": [[2, "2"]] }
            ]
        }
    });

    let set = parse_matrix(&raw, "nodes").unwrap();
    assert_eq!(set["rome"], vec![Sample::new(1, 1.0), Sample::new(2, 2.0)]);
}

#[test]
fn test_parse_vector() {
    let raw = json!({
        "status": "success",
        "data": {
            "resultType": "vector",
            "result": [
                { "metric": { "gputype": "h100" }, "value": [1700000000.5, "32"] },
                { "metric": { "gputype": "a100-sxm4-80gb" }, "value": [1700000000.5, "12"] }
            ]
        }
    });

    let set = parse_vector(&raw, "gputype").unwrap();
    assert_eq!(set["h100"], vec![Sample::new(1_700_000_000, 32.0)]);
    assert_eq!(set["a100-sxm4-80gb"], vec![Sample::new(1_700_000_000, 12.0)]);
}

#[test]
fn test_parse_empty_result() {
    let raw = json!({
        "status": "success",
        "data": { "resultType": "matrix", "result": [] }
    });
    assert!(parse_matrix(&raw, "account").unwrap().is_empty());
}

#[test]
fn test_parse_malformed_value() {
    let raw = json!({
        "status": "success",
        "data": {
            "resultType": "matrix",
            "result": [{ "metric": { "account": "cca" }, "values": [[1, "lots"]] }]
        }
    });
    assert!(matches!(
        parse_matrix(&raw, "account"),
        Err(ParseError::MalformedSample(_))
    ));
}

#[test]
fn test_parse_matrix_drops_nan_samples() {
    let raw = json!({
        "status": "success",
        "data": {
            "resultType": "matrix",
            "result": [
                {
                    "metric": { "account": "cca" },
                    "values": [[0, "4"], [60, "NaN"], [120, "6"]]
                },
                { "metric": { "account": "ccb" }, "values": [[60, "2"]] }
            ]
        }
    });

    let set = parse_matrix(&raw, "account").unwrap();
    assert_eq!(set["cca"], vec![Sample::new(0, 4.0), Sample::new(120, 6.0)]);
    assert_eq!(set["ccb"], vec![Sample::new(60, 2.0)]);
}

#[test]
fn test_parse_not_an_envelope() {
    let raw = json!([1, 2, 3]);
    assert!(matches!(
        parse_matrix(&raw, "account"),
        Err(ParseError::JsonError(_))
    ));
}
