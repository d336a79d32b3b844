//! Integration test: the validate-then-post-process pipeline for a
//! realistic route, including concurrent use of one normalizer.

use std::sync::Arc;
use std::thread;

use chrono::NaiveDate;
use reqshape_core::Shaped;
use reqshape_extract::{NormalizeError, NormalizerConfig, RequestNormalizer, RequestParts};
use serde_json::{json, Value};

/// `GET /users/:id/events?since=..&limit=..&eventType=..`
fn events_route() -> Value {
    json!({
        "type": "object",
        "properties": {
            "params": {
                "type": "object",
                "properties": {"id": {"type": "integer", "##parse": true, "minimum": 1}},
                "required": ["id"]
            },
            "query": {
                "type": "object",
                "properties": {
                    "since": {"type": "string", "format": "date", "##parse": true},
                    "limit": {"type": "integer", "##parse": true, "default": 50, "maximum": 500},
                    "eventType": {"type": "string", "##snake": true}
                }
            }
        },
        "required": ["params"]
    })
}

#[test]
fn test_request_parts_end_to_end() {
    let normalizer = RequestNormalizer::compile(&events_route()).unwrap();
    let parts = RequestParts::new()
        .with_param("id", "12")
        .with_query_pairs([("since", "2024-02-29"), ("eventType", "login")])
        .with_header("Accept", "application/json");

    let out = normalizer.normalize_request(&parts).unwrap();

    let params = out.get("params").unwrap();
    assert_eq!(params, &json!({"id": 12}));

    let query = out.get("query").unwrap();
    assert_eq!(
        query.get("since").and_then(Shaped::as_date),
        NaiveDate::from_ymd_opt(2024, 2, 29)
    );
    assert_eq!(query.get("limit"), Some(&Shaped::from(json!(50))));
    assert_eq!(query.get("event_type").and_then(Shaped::as_str), Some("login"));
    assert!(out.get("headers").is_none());
}

#[test]
fn test_serialized_output_renders_dates_as_strings() {
    let normalizer = RequestNormalizer::compile(&events_route()).unwrap();
    let out = normalizer
        .normalize(&json!({"params": {"id": "1"}, "query": {"since": "2024-01-05"}}))
        .unwrap();
    let rendered = serde_json::to_value(&out).unwrap();
    assert_eq!(rendered["query"]["since"], json!("2024-01-05"));
}

#[test]
fn test_violations_are_structured() {
    let normalizer = RequestNormalizer::compile(&events_route()).unwrap();
    let err = normalizer
        .normalize(&json!({"params": {"id": "0"}, "query": {"limit": "9000"}}))
        .unwrap_err();

    let NormalizeError::BadRequest { violations } = &err else {
        panic!("expected BadRequest, got {err:?}");
    };
    let paths: Vec<&str> = violations
        .violations()
        .iter()
        .map(|v| v.instance_path.as_str())
        .collect();
    assert!(paths.contains(&"/params/id"), "{paths:?}");
    assert!(paths.contains(&"/query/limit"), "{paths:?}");
    assert!(err.to_string().starts_with("bad request: 2 schema violation(s)"));
}

#[test]
fn test_invalid_date_rejected_by_validator() {
    let normalizer = RequestNormalizer::compile(&events_route()).unwrap();
    let err = normalizer
        .normalize(&json!({"params": {"id": "3"}, "query": {"since": "yesterday"}}))
        .unwrap_err();
    let NormalizeError::BadRequest { violations } = &err else {
        panic!("expected BadRequest, got {err:?}");
    };
    let paths: Vec<&str> = violations
        .violations()
        .iter()
        .map(|v| v.instance_path.as_str())
        .collect();
    assert_eq!(paths, ["/query/since"]);
}

#[test]
fn test_nullable_number_rejects_unparsable_string() {
    let normalizer = RequestNormalizer::compile(&json!({
        "type": "object",
        "properties": {
            "offset": {"type": ["integer", "null"], "##parse": true, "default": 0}
        }
    }))
    .unwrap();

    let err = normalizer.normalize(&json!({"offset": "abc"})).unwrap_err();
    let NormalizeError::BadRequest { violations } = &err else {
        panic!("expected BadRequest, got {err:?}");
    };
    assert_eq!(violations.violations()[0].instance_path, "/offset");

    let out = normalizer.normalize(&json!({"offset": "7"})).unwrap();
    assert_eq!(out, json!({"offset": 7}));
}

#[test]
fn test_config_disables_post_passes() {
    let config = NormalizerConfig {
        validate: true,
        cast_dates: false,
        backfill_snake_case: false,
    };
    let normalizer = RequestNormalizer::with_config(&events_route(), config).unwrap();
    let out = normalizer
        .normalize(&json!({
            "params": {"id": "4"},
            "query": {"since": "2024-01-05", "eventType": "x"}
        }))
        .unwrap();
    assert_eq!(
        out,
        json!({
            "params": {"id": 4},
            "query": {"since": "2024-01-05", "limit": 50, "eventType": "x"}
        })
    );
}

#[test]
fn test_concurrent_requests_do_not_share_registries() {
    let normalizer = Arc::new(RequestNormalizer::compile(&events_route()).unwrap());

    let handles: Vec<_> = (1..=8)
        .map(|i| {
            let normalizer = Arc::clone(&normalizer);
            thread::spawn(move || {
                // Only even requests carry a date or a camelCase field.
                let query = if i % 2 == 0 {
                    json!({"since": format!("2024-03-{i:02}"), "eventType": "e"})
                } else {
                    json!({})
                };
                let out = normalizer
                    .normalize(&json!({"params": {"id": i.to_string()}, "query": query}))
                    .unwrap();
                (i, out)
            })
        })
        .collect();

    for handle in handles {
        let (i, out) = handle.join().unwrap();
        assert_eq!(out.get("params"), Some(&Shaped::from(json!({"id": i}))));
        let query = out.get("query").unwrap();
        if i % 2 == 0 {
            assert_eq!(
                query.get("since").and_then(Shaped::as_date),
                NaiveDate::from_ymd_opt(2024, 3, i)
            );
            assert_eq!(query.get("event_type").and_then(Shaped::as_str), Some("e"));
        } else {
            assert_eq!(query, &json!({"limit": 50}));
        }
    }
}
