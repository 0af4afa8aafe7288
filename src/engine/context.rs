//! Process context handed to the enqueue and dequeue loops.

use std::sync::Arc;

use tracing::Span;

use super::Shutdown;
use crate::config::Config;
use crate::config::secrets::ExposeSecret;
use crate::db::{Db, PgQueueProvider};
use crate::error::Result;
use crate::queue::QueueProvider;

/// Everything a loop needs from process setup: the queue provider, the span
/// its logs are scoped to, and the stop signal.
///
/// Built once in `main` and passed down explicitly.
pub struct AppContext<P> {
    pub provider: P,
    pub span: Span,
    pub shutdown: Shutdown,
}

impl<P: QueueProvider> AppContext<P> {
    pub fn new(provider: P, span: Span) -> Self {
        Self {
            provider,
            span,
            shutdown: Shutdown::new(),
        }
    }
}

impl AppContext<PgQueueProvider> {
    /// Connect to the configured database, apply migrations and build a
    /// context around a Postgres provider for the configured queue.
    pub async fn connect(config: &Config, span: Span) -> Result<Self> {
        let db = Db::connect(config.database_url.expose_secret()).await?;
        db.migrate().await?;
        db.health_check().await?;

        let provider =
            PgQueueProvider::new(Arc::new(db), &config.queue_name, config.visibility_timeout);
        Ok(Self::new(provider, span))
    }
}
