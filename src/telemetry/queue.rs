//! Message span helpers.
//!
//! Span creation and finalization recording for messages flowing through
//! the polling loop.

use tracing::Span;

use crate::model::MessageId;

/// Start a span for handling one claimed message.
///
/// The `message.finalize` field is declared empty and is filled in by
/// [`record_finalized`].
pub fn start_message_span(id: MessageId, tag: Option<&str>) -> Span {
    tracing::info_span!(
        "message.handle",
        "message.id" = %id,
        "message.tag" = tag.unwrap_or(""),
        "message.finalize" = tracing::field::Empty,
    )
}

/// Record how a message was finalized on its span.
pub fn record_finalized(span: &Span, keep_journal: bool) {
    let mode = finalize_mode(keep_journal);
    span.record("message.finalize", mode);
    span.in_scope(|| {
        tracing::debug!(mode, "finalized");
    });
}

/// Label used for the finalization mode in spans and metrics.
pub fn finalize_mode(keep_journal: bool) -> &'static str {
    if keep_journal { "journal" } else { "delete" }
}
