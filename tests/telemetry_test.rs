//! Integration tests for telemetry initialization and span helpers.

use dbqueue::config::Config;
use dbqueue::model::MessageId;
use dbqueue::telemetry::{TelemetryConfig, init_telemetry};
use dbqueue::telemetry::queue::{finalize_mode, record_finalized, start_message_span};

#[test]
fn telemetry_initializes_without_endpoint() {
    let config = Config::from_lookup(|name| {
        (name == "DATABASE_URL").then(|| "postgres://localhost/test".to_string())
    })
    .unwrap();
    let telemetry = TelemetryConfig::for_service(&config, "dbqueue-test");
    assert!(telemetry.endpoint.is_none());
    assert_eq!(telemetry.default_filter, "info");

    // tracing subscriber can only be set once per process; init_telemetry
    // uses try_init(), so a second call returns Err instead of panicking.
    if let Ok(guard) = init_telemetry(telemetry) {
        assert!(!guard.is_exporting());
    }
}

#[test]
fn message_span_creates_and_records_finalization() {
    let span = start_message_span(MessageId(42), Some("foo"));
    record_finalized(&span, true);

    let untagged = start_message_span(MessageId(43), None);
    record_finalized(&untagged, false);
}

#[test]
fn finalize_mode_names() {
    assert_eq!(finalize_mode(true), "journal");
    assert_eq!(finalize_mode(false), "delete");
}

#[test]
fn metric_instruments_build_without_a_provider() {
    use opentelemetry::KeyValue;

    dbqueue::telemetry::metrics::messages_enqueued().add(1, &[KeyValue::new("tagged", "true")]);
    dbqueue::telemetry::metrics::queue_polls().add(1, &[KeyValue::new("result", "empty")]);
    dbqueue::telemetry::metrics::operation_duration_ms()
        .record(1.5, &[KeyValue::new("operation", "queue.enqueue")]);
}
