//! Core data model.
//!
//! A message is a tagged text payload owned by the queue store. Consumers
//! receive a snapshot of it when they claim it.

pub mod message;

pub use message::{Body, Header, Message, MessageId};
