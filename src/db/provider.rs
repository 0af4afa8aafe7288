//! Postgres-backed queue provider.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use uuid::Uuid;

use super::Db;
use crate::error::{Error, Result};
use crate::model::{Message, MessageId};
use crate::queue::{Consumer, Publisher, QueueProvider};

/// Hands out consumers and publishers for one logical queue in Postgres.
#[derive(Clone)]
pub struct PgQueueProvider {
    db: Arc<Db>,
    queue_name: Arc<str>,
    visibility_timeout: Duration,
}

impl PgQueueProvider {
    pub fn new(db: Arc<Db>, queue_name: &str, visibility_timeout: Duration) -> Self {
        Self {
            db,
            queue_name: Arc::from(queue_name),
            visibility_timeout,
        }
    }

    /// Archived copy of a message finalized with `keep_journal = true`.
    pub async fn journaled(&self, id: MessageId) -> Result<Option<Message>> {
        self.db.journaled_message(&self.queue_name, id).await
    }

    /// Number of messages eligible for retrieval right now.
    pub async fn visible_count(&self, tag: Option<&str>) -> Result<usize> {
        let n = self.db.visible_count(&self.queue_name, tag).await?;
        Ok(n.max(0) as usize)
    }
}

impl QueueProvider for PgQueueProvider {
    type Consumer = PgConsumer;
    type Publisher = PgPublisher;

    fn queue_consumer(&self) -> PgConsumer {
        let consumer_id = Uuid::new_v4();
        debug!(queue = %self.queue_name, %consumer_id, "consumer created");
        PgConsumer {
            db: Arc::clone(&self.db),
            queue_name: Arc::clone(&self.queue_name),
            visibility_timeout: self.visibility_timeout,
            consumer_id,
        }
    }

    fn queue_publisher(&self) -> PgPublisher {
        PgPublisher {
            db: Arc::clone(&self.db),
            queue_name: Arc::clone(&self.queue_name),
        }
    }
}

/// Publisher handle for [`PgQueueProvider`].
pub struct PgPublisher {
    db: Arc<Db>,
    queue_name: Arc<str>,
}

impl Publisher for PgPublisher {
    async fn enqueue(&self, tag: Option<&str>, text: &str) -> Result<Message> {
        self.db.send_message(&self.queue_name, tag, text).await
    }
}

/// Consumer handle for [`PgQueueProvider`]. Claims are stamped with
/// `consumer_id`.
pub struct PgConsumer {
    db: Arc<Db>,
    queue_name: Arc<str>,
    visibility_timeout: Duration,
    consumer_id: Uuid,
}

impl Consumer for PgConsumer {
    async fn get_message_from_queue(&self, tag: Option<&str>) -> Result<Option<Message>> {
        self.db
            .read_message(
                &self.queue_name,
                tag,
                self.visibility_timeout,
                self.consumer_id,
            )
            .await
    }

    async fn dequeue(&self, id: MessageId, keep_journal: bool) -> Result<()> {
        let finalized = if keep_journal {
            self.db
                .archive_message(&self.queue_name, id, self.consumer_id)
                .await?
        } else {
            self.db
                .delete_message(&self.queue_name, id, self.consumer_id)
                .await?
        };

        if finalized {
            Ok(())
        } else {
            Err(Error::InvalidState { id })
        }
    }
}
