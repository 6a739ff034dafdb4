//! Task queue adapters.
//!
//! - `TokioTaskQueue` - Bounded channel plus worker with retry policies
//! - `InMemoryTaskQueue` - Records jobs for inspection in tests

mod in_memory_task_queue;
mod tokio_task_queue;

pub use in_memory_task_queue::InMemoryTaskQueue;
pub use tokio_task_queue::{TaskWorker, TokioTaskQueue};
