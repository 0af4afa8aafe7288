//! Metric instrument factories for dbqueue.
//!
//! Uses the OTel Meter API with the globally-registered `MeterProvider`.
//! All instruments are created lazily from the `"dbqueue"` meter. Without an
//! OTLP endpoint the global provider is a no-op.

use opentelemetry::metrics::{Counter, Histogram, Meter};

/// Returns the shared meter for dbqueue instruments.
fn meter() -> Meter {
    opentelemetry::global::meter("dbqueue")
}

/// Counter: messages inserted by the enqueue loop.
/// Labels: `tagged` ("true" | "false").
pub fn messages_enqueued() -> Counter<u64> {
    meter()
        .u64_counter("dbqueue.messages.enqueued")
        .with_description("Number of messages enqueued")
        .build()
}

/// Counter: messages finalized by the polling loop.
/// Labels: `mode` ("journal" | "delete").
pub fn messages_finalized() -> Counter<u64> {
    meter()
        .u64_counter("dbqueue.messages.finalized")
        .with_description("Number of messages dequeued and finalized")
        .build()
}

/// Counter: retrieval attempts by the polling loop.
/// Labels: `result` ("hit" | "empty").
pub fn queue_polls() -> Counter<u64> {
    meter()
        .u64_counter("dbqueue.queue.polls")
        .with_description("Number of queue polls")
        .build()
}

/// Counter: store-level operations (send, read, archive, delete).
/// Labels: `queue`, `operation`.
pub fn queue_operations() -> Counter<u64> {
    meter()
        .u64_counter("dbqueue.queue.operations")
        .with_description("Number of queue store operations")
        .build()
}

/// Histogram: operation duration in milliseconds.
/// Labels: `operation`.
pub fn operation_duration_ms() -> Histogram<f64> {
    meter()
        .f64_histogram("dbqueue.operation.duration_ms")
        .with_description("Operation duration in milliseconds")
        .with_unit("ms")
        .build()
}
