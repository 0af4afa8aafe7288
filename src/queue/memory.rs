//! In-memory queue provider.
//!
//! Honors the full consumer/publisher contract without a database. Used by
//! the test suite and handy for local experiments.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Mutex;
use tokio::time::Instant;
use uuid::Uuid;

use super::{Consumer, Publisher, QueueProvider};
use crate::config::DEFAULT_VISIBILITY_TIMEOUT;
use crate::error::{Error, Result};
use crate::model::{Header, Message, MessageId};

#[derive(Debug)]
struct Claim {
    owner: Uuid,
    expires_at: Instant,
}

/// A live (not yet finalized) message.
#[derive(Debug)]
struct Record {
    header: Header,
    text: String,
    claim: Option<Claim>,
}

impl Record {
    fn is_visible(&self, now: Instant) -> bool {
        self.claim.as_ref().is_none_or(|c| c.expires_at <= now)
    }

    fn is_claimed_by(&self, owner: Uuid, now: Instant) -> bool {
        matches!(&self.claim, Some(c) if c.owner == owner && c.expires_at > now)
    }

    fn matches(&self, tag: Option<&str>) -> bool {
        tag.is_none_or(|t| self.header.tag.as_deref() == Some(t))
    }

    fn snapshot(&self) -> Message {
        Message::new(self.header.clone(), self.text.clone())
    }
}

struct State {
    /// Next id to hand out. Only ever grows.
    next_id: i64,
    /// Live messages, ordered by id (= enqueue order).
    live: BTreeMap<MessageId, Record>,
    /// Archived copies of messages finalized with `keep_journal`.
    journal: HashMap<MessageId, Message>,
    available: bool,
}

impl State {
    fn ensure_available(&self) -> Result<()> {
        if self.available {
            Ok(())
        } else {
            Err(Error::StoreUnavailable("in-memory store is offline".into()))
        }
    }
}

/// In-memory store. Clones share the same state.
#[derive(Clone)]
pub struct InMemoryQueue {
    state: Arc<Mutex<State>>,
    visibility_timeout: Duration,
}

impl InMemoryQueue {
    pub fn new() -> Self {
        Self::with_visibility_timeout(DEFAULT_VISIBILITY_TIMEOUT)
    }

    pub fn with_visibility_timeout(visibility_timeout: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                next_id: 1,
                live: BTreeMap::new(),
                journal: HashMap::new(),
                available: true,
            })),
            visibility_timeout,
        }
    }

    /// Simulate the store going away (`false`) or coming back (`true`).
    pub async fn set_available(&self, available: bool) {
        self.state.lock().await.available = available;
    }

    /// Archived copy of a message finalized with `keep_journal = true`.
    pub async fn journaled(&self, id: MessageId) -> Option<Message> {
        self.state.lock().await.journal.get(&id).cloned()
    }

    /// Number of messages eligible for retrieval right now.
    pub async fn visible_count(&self, tag: Option<&str>) -> usize {
        let now = Instant::now();
        let state = self.state.lock().await;
        state
            .live
            .values()
            .filter(|r| r.matches(tag) && r.is_visible(now))
            .count()
    }
}

impl Default for InMemoryQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl QueueProvider for InMemoryQueue {
    type Consumer = MemoryConsumer;
    type Publisher = MemoryPublisher;

    fn queue_consumer(&self) -> MemoryConsumer {
        MemoryConsumer {
            queue: self.clone(),
            owner: Uuid::new_v4(),
        }
    }

    fn queue_publisher(&self) -> MemoryPublisher {
        MemoryPublisher {
            queue: self.clone(),
        }
    }
}

/// Publisher handle for [`InMemoryQueue`].
#[derive(Clone)]
pub struct MemoryPublisher {
    queue: InMemoryQueue,
}

impl Publisher for MemoryPublisher {
    async fn enqueue(&self, tag: Option<&str>, text: &str) -> Result<Message> {
        let mut state = self.queue.state.lock().await;
        state.ensure_available()?;

        let id = MessageId(state.next_id);
        state.next_id += 1;

        let record = Record {
            header: Header {
                message_id: id,
                tag: tag.map(str::to_string),
                enqueued_at: Utc::now(),
                read_count: 0,
            },
            text: text.to_string(),
            claim: None,
        };
        let message = record.snapshot();
        state.live.insert(id, record);
        Ok(message)
    }
}

/// Consumer handle for [`InMemoryQueue`]. Owns its claims.
pub struct MemoryConsumer {
    queue: InMemoryQueue,
    owner: Uuid,
}

impl Consumer for MemoryConsumer {
    async fn get_message_from_queue(&self, tag: Option<&str>) -> Result<Option<Message>> {
        let now = Instant::now();
        let mut state = self.queue.state.lock().await;
        state.ensure_available()?;

        let Some(record) = state
            .live
            .values_mut()
            .find(|r| r.matches(tag) && r.is_visible(now))
        else {
            return Ok(None);
        };

        record.claim = Some(Claim {
            owner: self.owner,
            expires_at: now + self.queue.visibility_timeout,
        });
        record.header.read_count += 1;
        Ok(Some(record.snapshot()))
    }

    async fn dequeue(&self, id: MessageId, keep_journal: bool) -> Result<()> {
        let now = Instant::now();
        let mut state = self.queue.state.lock().await;
        state.ensure_available()?;

        let claimed = state
            .live
            .get(&id)
            .is_some_and(|r| r.is_claimed_by(self.owner, now));
        if !claimed {
            return Err(Error::InvalidState { id });
        }

        if let Some(record) = state.live.remove(&id)
            && keep_journal
        {
            state.journal.insert(id, record.snapshot());
        }
        Ok(())
    }
}
