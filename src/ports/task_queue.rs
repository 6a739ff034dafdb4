//! Task Queue Port - Out-of-band execution of handoff jobs.

use async_trait::async_trait;

use crate::domain::foundation::JobId;
use crate::domain::handoff::{FailedJob, Job};

use super::{DocumentStoreError, ModelError, SinkError, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("Queue is closed")]
    Closed,

    #[error("Queue is full")]
    Full,
}

/// Why a single job attempt failed.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("document store error: {0}")]
    Document(#[from] DocumentStoreError),

    #[error("delivery failed: {0}")]
    Sink(#[from] SinkError),

    #[error("queue error: {0}")]
    Queue(#[from] QueueError),

    #[error("invalid job: {0}")]
    Invalid(String),
}

impl JobError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}

/// Port for enqueueing jobs. Delivery is at-least-once with a retry policy
/// chosen per job kind.
#[async_trait]
pub trait TaskQueue: Send + Sync {
    async fn enqueue(&self, job: Job) -> Result<JobId, QueueError>;

    /// Jobs that exhausted their attempts.
    async fn failures(&self) -> Vec<FailedJob>;
}

/// Executes one attempt of a job.
#[async_trait]
pub trait JobHandler: Send + Sync {
    async fn handle(&self, job: &Job) -> Result<(), JobError>;
}
