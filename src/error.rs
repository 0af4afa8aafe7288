//! Error types for dbqueue.

use thiserror::Error;

use crate::model::MessageId;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or unrecognized command-line option.
    #[error("invalid options: {0}")]
    Argument(String),

    /// The backing store could not be reached. Never retried here.
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Finalizing a message the caller does not currently hold a claim on.
    #[error("message {id} is not claimed by this consumer")]
    InvalidState { id: MessageId },

    /// Handing a message body to its destination (e.g. stdout) failed.
    #[error("output failed: {0}")]
    Output(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl From<sqlx::Error> for Error {
    fn from(e: sqlx::Error) -> Self {
        Error::StoreUnavailable(Box::new(e))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
