//! Queue loops: draining with backoff, bulk enqueue, and the context and
//! stop signal they run under.

pub mod context;
pub mod drain;
pub mod enqueue;
pub mod shutdown;

pub use context::AppContext;
pub use drain::{Count, DrainOptions, DrainReport, drain, run_dequeue};
pub use enqueue::{EnqueueOptions, EnqueueReport, enqueue_copies, run_enqueue};
pub use shutdown::Shutdown;
