//! # dbqueue
//!
//! Command-line front end for a database-backed message queue.
//!
//! Two binaries sit on top of this library: `enqueue` inserts copies of a
//! message under an optional tag, and `dequeue` drains messages with an
//! optional tag filter, backing off while the queue is empty. Storage sits
//! behind the [`queue::QueueProvider`] contract; Postgres ([`db`]) is the
//! production store and [`queue::InMemoryQueue`] serves tests.

pub mod cli;
pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod model;
pub mod queue;
pub mod telemetry;
