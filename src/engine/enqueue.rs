//! Enqueue loop: insert N copies of one message under one tag.

use std::time::{Duration, Instant};

use opentelemetry::KeyValue;
use tracing::{Instrument, debug, info, warn};

use super::AppContext;
use crate::error::Result;
use crate::model::MessageId;
use crate::queue::{Publisher, QueueProvider};
use crate::telemetry::metrics;

/// Parameters of one enqueue run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnqueueOptions {
    pub text: String,
    pub tag: Option<String>,
    /// Copies to insert.
    pub count: u32,
}

impl EnqueueOptions {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tag: None,
            count: 1,
        }
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }
}

/// Result of an enqueue run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnqueueReport {
    /// Messages inserted.
    pub inserted: u64,
    /// Id of the first inserted message; `None` when nothing was inserted.
    pub first_id: Option<MessageId>,
    pub last_id: Option<MessageId>,
    pub elapsed: Duration,
}

/// Insert `options.count` copies sequentially. Stops at the first failure;
/// copies inserted before it stay in the queue.
pub async fn enqueue_copies<P: Publisher>(
    publisher: &P,
    options: &EnqueueOptions,
) -> Result<EnqueueReport> {
    let started = Instant::now();
    let tag = options.tag.as_deref();
    let mut inserted = 0u64;
    let mut first_id = None;
    let mut last_id = None;

    for _ in 0..options.count {
        match publisher.enqueue(tag, &options.text).await {
            Ok(message) => {
                debug!(id = %message.id(), "enqueued message");
                first_id.get_or_insert(message.id());
                last_id = Some(message.id());
                inserted += 1;
            }
            Err(e) => {
                warn!(inserted, requested = options.count, "enqueue aborted: {e}");
                return Err(e);
            }
        }
    }

    let elapsed = started.elapsed();
    metrics::messages_enqueued().add(
        inserted,
        &[KeyValue::new("tagged", tag.is_some().to_string())],
    );
    metrics::operation_duration_ms().record(
        elapsed.as_secs_f64() * 1000.0,
        &[KeyValue::new("operation", "queue.enqueue")],
    );

    info!("enqueued {inserted} message(s)");
    debug!("completed in {:.2} ms", elapsed.as_secs_f64() * 1000.0);

    Ok(EnqueueReport {
        inserted,
        first_id,
        last_id,
        elapsed,
    })
}

/// Enqueue through a fresh publisher from the context's provider.
pub async fn run_enqueue<P: QueueProvider>(
    ctx: &AppContext<P>,
    options: &EnqueueOptions,
) -> Result<EnqueueReport> {
    let publisher = ctx.provider.queue_publisher();
    enqueue_copies(&publisher, options)
        .instrument(ctx.span.clone())
        .await
}
