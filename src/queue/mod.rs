//! Queue access contract: publisher, consumer, and the provider that hands
//! both out for one underlying store.
//!
//! Message lifecycle, as seen through these traits:
//!
//! ```text
//! enqueue ──▶ visible ──get_message_from_queue──▶ claimed ──dequeue──▶ finalized
//!                ▲                                   │            (deleted or journaled)
//!                └──────── claim expires ────────────┘
//! ```
//!
//! Claim expiry is store policy. Selection order among eligible messages is
//! also store policy; both providers in this crate return the oldest message
//! (FIFO by id).

pub mod memory;

pub use memory::InMemoryQueue;

use std::future::Future;

use crate::error::Result;
use crate::model::{Message, MessageId};

/// Appends messages to the queue.
pub trait Publisher: Send + Sync {
    /// Insert one message. On success it carries a fresh id and is immediately
    /// visible. Not retried internally.
    fn enqueue(&self, tag: Option<&str>, text: &str)
    -> impl Future<Output = Result<Message>> + Send;
}

/// Claims and finalizes messages.
///
/// Each consumer handle has its own claim identity; only the handle that
/// claimed a message may finalize it.
pub trait Consumer: Send + Sync {
    /// Claim at most one visible message, restricted to `tag` when given.
    /// `Ok(None)` means nothing eligible right now; that is not an error.
    fn get_message_from_queue(
        &self,
        tag: Option<&str>,
    ) -> impl Future<Output = Result<Option<Message>>> + Send;

    /// Finalize a message claimed by this handle: journal it when
    /// `keep_journal`, otherwise erase it. Fails with
    /// [`Error::InvalidState`](crate::error::Error::InvalidState) when the
    /// handle holds no live claim on `id`, including a second call for the
    /// same id.
    fn dequeue(&self, id: MessageId, keep_journal: bool)
    -> impl Future<Output = Result<()>> + Send;
}

/// Factory for consumer and publisher handles bound to one store.
///
/// Obtaining handles repeatedly is cheap and always targets the same store.
pub trait QueueProvider: Send + Sync {
    type Consumer: Consumer + 'static;
    type Publisher: Publisher + 'static;

    fn queue_consumer(&self) -> Self::Consumer;

    fn queue_publisher(&self) -> Self::Publisher;
}
