//! Queue operations via direct SQLx.
//!
//! Send, claim-read, archive (journal) and delete against the
//! `queue_messages` / `queue_journal` tables.

use std::time::Duration;

use chrono::{DateTime, Utc};
use opentelemetry::KeyValue;
use uuid::Uuid;

use crate::error::Result;
use crate::model::{Header, Message, MessageId};
use crate::telemetry::metrics;

fn record_operation(queue_name: &str, operation: &'static str) {
    metrics::queue_operations().add(
        1,
        &[
            KeyValue::new("queue", queue_name.to_string()),
            KeyValue::new("operation", operation),
        ],
    );
}

impl super::Db {
    /// Insert a message. It is visible as soon as the statement commits.
    pub async fn send_message(
        &self,
        queue_name: &str,
        tag: Option<&str>,
        text: &str,
    ) -> Result<Message> {
        let row: MessageRow = sqlx::query_as(
            "INSERT INTO queue_messages (queue, tag, body)
             VALUES ($1, $2, $3)
             RETURNING id, tag, body, enqueued_at, read_ct",
        )
        .bind(queue_name)
        .bind(tag)
        .bind(text)
        .fetch_one(self.pool())
        .await?;
        record_operation(queue_name, "send");
        Ok(row.into_message())
    }

    /// Claim the oldest visible message (optionally with a matching tag) for
    /// `consumer`. Returns None if nothing is eligible.
    pub async fn read_message(
        &self,
        queue_name: &str,
        tag: Option<&str>,
        visibility_timeout: Duration,
        consumer: Uuid,
    ) -> Result<Option<Message>> {
        let row: Option<MessageRow> = sqlx::query_as(
            "UPDATE queue_messages m
             SET vt = now() + make_interval(secs => $3), read_ct = m.read_ct + 1, claimed_by = $4
             FROM (
                 SELECT id FROM queue_messages
                 WHERE queue = $1
                 AND ($2::text IS NULL OR tag = $2)
                 AND vt <= now()
                 ORDER BY id
                 LIMIT 1
                 FOR UPDATE SKIP LOCKED
             ) candidate
             WHERE m.id = candidate.id
             RETURNING m.id, m.tag, m.body, m.enqueued_at, m.read_ct",
        )
        .bind(queue_name)
        .bind(tag)
        .bind(visibility_timeout.as_secs_f64())
        .bind(consumer)
        .fetch_optional(self.pool())
        .await?;

        record_operation(
            queue_name,
            if row.is_some() { "read" } else { "read_empty" },
        );
        Ok(row.map(MessageRow::into_message))
    }

    /// Move a message claimed by `consumer` into the journal.
    /// Returns false when `consumer` holds no live claim on it.
    pub async fn archive_message(
        &self,
        queue_name: &str,
        id: MessageId,
        consumer: Uuid,
    ) -> Result<bool> {
        let rows_affected = sqlx::query(
            "WITH done AS (
                 DELETE FROM queue_messages
                 WHERE queue = $1 AND id = $2 AND claimed_by = $3 AND vt > now()
                 RETURNING id, queue, tag, body, enqueued_at, read_ct
             )
             INSERT INTO queue_journal (id, queue, tag, body, enqueued_at, read_ct)
             SELECT id, queue, tag, body, enqueued_at, read_ct FROM done",
        )
        .bind(queue_name)
        .bind(id.0)
        .bind(consumer)
        .execute(self.pool())
        .await?
        .rows_affected();

        record_operation(queue_name, "archive");
        Ok(rows_affected > 0)
    }

    /// Delete a message claimed by `consumer` permanently.
    /// Returns false when `consumer` holds no live claim on it.
    pub async fn delete_message(
        &self,
        queue_name: &str,
        id: MessageId,
        consumer: Uuid,
    ) -> Result<bool> {
        let rows_affected = sqlx::query(
            "DELETE FROM queue_messages
             WHERE queue = $1 AND id = $2 AND claimed_by = $3 AND vt > now()",
        )
        .bind(queue_name)
        .bind(id.0)
        .bind(consumer)
        .execute(self.pool())
        .await?
        .rows_affected();

        record_operation(queue_name, "delete");
        Ok(rows_affected > 0)
    }

    /// Archived copy of a journaled message.
    pub async fn journaled_message(
        &self,
        queue_name: &str,
        id: MessageId,
    ) -> Result<Option<Message>> {
        let row: Option<MessageRow> = sqlx::query_as(
            "SELECT id, tag, body, enqueued_at, read_ct FROM queue_journal
             WHERE queue = $1 AND id = $2",
        )
        .bind(queue_name)
        .bind(id.0)
        .fetch_optional(self.pool())
        .await?;
        Ok(row.map(MessageRow::into_message))
    }

    /// Number of messages eligible for retrieval right now.
    pub async fn visible_count(&self, queue_name: &str, tag: Option<&str>) -> Result<i64> {
        let row: (i64,) = sqlx::query_as(
            "SELECT count(*) FROM queue_messages
             WHERE queue = $1 AND ($2::text IS NULL OR tag = $2) AND vt <= now()",
        )
        .bind(queue_name)
        .bind(tag)
        .fetch_one(self.pool())
        .await?;
        Ok(row.0)
    }
}

/// Internal row type for sqlx::FromRow.
#[derive(sqlx::FromRow)]
struct MessageRow {
    id: i64,
    tag: Option<String>,
    body: String,
    enqueued_at: DateTime<Utc>,
    read_ct: i32,
}

impl MessageRow {
    fn into_message(self) -> Message {
        Message::new(
            Header {
                message_id: MessageId(self.id),
                tag: self.tag,
                enqueued_at: self.enqueued_at,
                read_count: self.read_ct.max(0) as u32,
            },
            self.body,
        )
    }
}
