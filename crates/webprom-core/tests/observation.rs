//! Web record decoding tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use serde_json::json;
use webprom_core::observation::{Measurement, WebObservation};
use webprom_core::ErrorCode;

#[test]
fn decodes_full_record() {
    let v = json!({
        "type": "web",
        "controller": "posts",
        "action": "show",
        "status": 200,
        "custom_labels": {"tenant": "acme", "beta": true},
        "timings": {
            "total_duration": 0.42,
            "redis": {"duration": 0.01, "calls": 3},
            "sql": {"duration": 0.1, "calls": 7}
        },
        "queue_time": 0.002
    });
    let obs = WebObservation::from_value(&v).unwrap();

    assert_eq!(obs.controller.as_deref(), Some("posts"));
    assert_eq!(obs.status.as_deref(), Some("200"));
    let custom = obs.custom_labels.unwrap();
    assert_eq!(custom.get("tenant"), Some("acme"));
    assert_eq!(custom.get("beta"), Some("true"));

    let timings = obs.timings.unwrap();
    assert_eq!(timings.total_duration, Some(Measurement::Seconds(0.42)));
    assert_eq!(timings.redis.unwrap().duration, Some(Measurement::Seconds(0.01)));
    assert_eq!(timings.sql.unwrap().duration, Some(Measurement::Seconds(0.1)));
    assert_eq!(obs.queue_time, Some(Measurement::Seconds(0.002)));
}

#[test]
fn missing_and_null_fields_are_absent() {
    let v = json!({"status": "404", "controller": null, "timings": null});
    let obs = WebObservation::from_value(&v).unwrap();
    assert!(obs.controller.is_none());
    assert!(obs.action.is_none());
    assert_eq!(obs.status.as_deref(), Some("404"));
    assert!(obs.custom_labels.is_none());
    assert!(obs.timings.is_none());
    assert!(obs.queue_time.is_none());
}

#[test]
fn non_numeric_duration_is_kept_as_malformed() {
    let v = json!({"timings": {"total_duration": "slow"}, "queue_time": [1]});
    let obs = WebObservation::from_value(&v).unwrap();

    let total = obs.timings.unwrap().total_duration.unwrap();
    assert_eq!(total, Measurement::Malformed("\"slow\"".into()));
    let err = total.seconds("timings.total_duration").unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidObservation);
    assert!(matches!(obs.queue_time, Some(Measurement::Malformed(_))));
}

#[test]
fn structural_errors_reject_the_record() {
    for bad in [
        json!({"timings": "fast"}),
        json!({"controller": {"nested": 1}}),
        json!({"custom_labels": {"tenant": ["a", "b"]}}),
        json!({"custom_labels": "tenant=acme"}),
        json!({"custom_labels": {"le": "x"}}),
        json!({"custom_labels": {"bad-name": "1"}}),
        json!({"custom_labels": {"q\"x": "2"}}),
        json!({"custom_labels": {"__meta": "m"}}),
    ] {
        let err = WebObservation::from_value(&bad).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidObservation, "{bad}");
    }
}
