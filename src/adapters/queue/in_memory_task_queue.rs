//! InMemoryTaskQueue - Records enqueued jobs without running them.
//!
//! Tests inspect what the engine emitted, and can drain the queue through a
//! handler to exercise job flows step by step.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::JobId;
use crate::domain::handoff::{FailedJob, Job};
use crate::ports::{JobError, JobHandler, QueueError, TaskQueue};

#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskQueue {
    jobs: Arc<RwLock<Vec<Job>>>,
}

impl InMemoryTaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Jobs still waiting, oldest first.
    pub async fn jobs(&self) -> Vec<Job> {
        self.jobs.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }

    /// Removes and returns the oldest job.
    pub async fn pop(&self) -> Option<Job> {
        let mut jobs = self.jobs.write().await;
        if jobs.is_empty() {
            None
        } else {
            Some(jobs.remove(0))
        }
    }

    /// Runs the oldest job once through `handler`.
    pub async fn run_next(&self, handler: &dyn JobHandler) -> Option<Result<(), JobError>> {
        let job = self.pop().await?;
        Some(handler.handle(&job).await)
    }
}

#[async_trait]
impl TaskQueue for InMemoryTaskQueue {
    async fn enqueue(&self, job: Job) -> Result<JobId, QueueError> {
        self.jobs.write().await.push(job);
        Ok(JobId::new())
    }

    async fn failures(&self) -> Vec<FailedJob> {
        Vec::new()
    }
}
