//! Polling loop: claim, hand off, finalize, back off when idle.

use std::time::{Duration, Instant};

use opentelemetry::KeyValue;
use tracing::{Instrument, info, trace, warn};

use super::{AppContext, Shutdown};
use crate::config::DEFAULT_POLL_INTERVAL;
use crate::error::Result;
use crate::model::Header;
use crate::model::message::preview;
use crate::queue::{Consumer, QueueProvider};
use crate::telemetry::metrics;
use crate::telemetry::queue::{finalize_mode, record_finalized, start_message_span};

/// Characters of body text included in the per-message log line.
pub const PREVIEW_CHARS: usize = 50;

/// How many messages to drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Count {
    Bounded(u64),
    /// Run until stopped.
    #[default]
    Unbounded,
}

impl Count {
    pub fn is_reached(self, processed: u64) -> bool {
        matches!(self, Count::Bounded(n) if processed >= n)
    }
}

impl std::fmt::Display for Count {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Count::Bounded(n) => write!(f, "{n}"),
            Count::Unbounded => write!(f, "unbounded"),
        }
    }
}

/// Parameters of one drain run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrainOptions {
    /// Only claim messages with this tag.
    pub tag: Option<String>,
    pub count: Count,
    /// Journal finalized messages instead of erasing them.
    pub keep_journal: bool,
    /// Backoff after an empty poll.
    pub poll_interval: Duration,
}

impl Default for DrainOptions {
    fn default() -> Self {
        Self {
            tag: None,
            count: Count::Unbounded,
            keep_journal: false,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// What a drain run did before it returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrainReport {
    /// Messages finalized.
    pub processed: u64,
    /// True when the run ended on the shutdown signal rather than the count.
    pub cancelled: bool,
}

/// Drain messages from `consumer` until `options.count` messages have been
/// finalized or `shutdown` fires.
///
/// For every claimed message the body is taken and passed to `sink` first;
/// only then is the message finalized. A sink error ends the run with the
/// message left claimed, so it becomes visible again once the claim lapses. Empty polls do not count toward the
/// target and are followed by a `poll_interval` sleep that the shutdown
/// signal interrupts. Store errors end the run and are returned as is.
pub async fn drain<C, F>(
    consumer: &C,
    options: &DrainOptions,
    shutdown: &Shutdown,
    mut sink: F,
) -> Result<DrainReport>
where
    C: Consumer,
    F: FnMut(&Header, &str) -> Result<()>,
{
    let tag = options.tag.as_deref();
    let mut processed = 0u64;

    info!(
        tag = tag.unwrap_or("*"),
        count = %options.count,
        keep_journal = options.keep_journal,
        "draining queue"
    );

    while !options.count.is_reached(processed) {
        if shutdown.is_triggered() {
            info!(processed, "drain stopped by shutdown");
            return Ok(DrainReport {
                processed,
                cancelled: true,
            });
        }

        let Some(mut message) = consumer.get_message_from_queue(tag).await? else {
            metrics::queue_polls().add(1, &[KeyValue::new("result", "empty")]);
            trace!("queue empty, backing off");
            tokio::select! {
                _ = shutdown.wait() => {}
                _ = tokio::time::sleep(options.poll_interval) => {}
            }
            continue;
        };
        metrics::queue_polls().add(1, &[KeyValue::new("result", "hit")]);

        let id = message.id();
        let span = start_message_span(id, message.tag());

        // The body is not available once the message is finalized.
        let text = message.take_body().map(|b| b.text).unwrap_or_default();
        let text_preview = preview(&text, PREVIEW_CHARS);
        if let Err(e) = sink(&message.header, &text) {
            warn!(id = %id, processed, "message hand-off failed, leaving it claimed: {e}");
            return Err(e);
        }

        let started = Instant::now();
        consumer
            .dequeue(id, options.keep_journal)
            .instrument(span.clone())
            .await?;
        record_finalized(&span, options.keep_journal);
        metrics::messages_finalized().add(
            1,
            &[KeyValue::new("mode", finalize_mode(options.keep_journal))],
        );
        metrics::operation_duration_ms().record(
            started.elapsed().as_secs_f64() * 1000.0,
            &[KeyValue::new("operation", "queue.dequeue")],
        );

        processed += 1;
        span.in_scope(|| {
            info!(id = %id, text = %text_preview, "dequeued message");
        });
    }

    Ok(DrainReport {
        processed,
        cancelled: false,
    })
}

/// Drain through a fresh consumer from the context's provider, logging under
/// the context span and stopping on the context's shutdown signal.
pub async fn run_dequeue<P, F>(
    ctx: &AppContext<P>,
    options: &DrainOptions,
    sink: F,
) -> Result<DrainReport>
where
    P: QueueProvider,
    F: FnMut(&Header, &str) -> Result<()>,
{
    let consumer = ctx.provider.queue_consumer();
    drain(&consumer, options, &ctx.shutdown, sink)
        .instrument(ctx.span.clone())
        .await
}
