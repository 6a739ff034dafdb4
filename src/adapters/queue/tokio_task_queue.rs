//! TokioTaskQueue - In-process job queue with per-kind retry policies.
//!
//! Producers push jobs into a bounded channel. A single worker loop drains
//! the channel and runs every job on its own task, so a job sleeping
//! between attempts never holds up the others. Jobs that exhaust their
//! attempts are logged and kept in a failure list.
//!
//! ## Wiring
//!
//! ```ignore
//! let (queue, worker) = TokioTaskQueue::channel(policies, 256);
//! let dispatcher = Arc::new(JobDispatcher::new(..., Arc::new(queue.clone())));
//! tokio::spawn(worker.run(dispatcher));
//! ```

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tokio::time::sleep;

use crate::domain::foundation::JobId;
use crate::domain::handoff::{FailedJob, Job, RetryPolicies, RetryPolicy};
use crate::ports::{JobHandler, QueueError, TaskQueue};

struct QueuedJob {
    id: JobId,
    job: Job,
}

/// Producer side of the queue.
#[derive(Clone)]
pub struct TokioTaskQueue {
    sender: mpsc::Sender<QueuedJob>,
    failures: Arc<RwLock<Vec<FailedJob>>>,
}

/// Consumer side; run it on its own task.
pub struct TaskWorker {
    receiver: mpsc::Receiver<QueuedJob>,
    policies: RetryPolicies,
    failures: Arc<RwLock<Vec<FailedJob>>>,
}

impl TokioTaskQueue {
    pub fn channel(policies: RetryPolicies, capacity: usize) -> (Self, TaskWorker) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let failures = Arc::new(RwLock::new(Vec::new()));
        (
            Self {
                sender,
                failures: failures.clone(),
            },
            TaskWorker {
                receiver,
                policies,
                failures,
            },
        )
    }
}

#[async_trait]
impl TaskQueue for TokioTaskQueue {
    async fn enqueue(&self, job: Job) -> Result<JobId, QueueError> {
        let id = JobId::new();
        let kind = job.kind();
        self.sender
            .try_send(QueuedJob { id, job })
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => QueueError::Full,
                mpsc::error::TrySendError::Closed(_) => QueueError::Closed,
            })?;
        tracing::debug!(job_id = %id, kind = %kind, "job enqueued");
        Ok(id)
    }

    async fn failures(&self) -> Vec<FailedJob> {
        self.failures.read().await.clone()
    }
}

impl TaskWorker {
    /// Runs until every producer handle is dropped.
    pub async fn run(mut self, handler: Arc<dyn JobHandler>) {
        while let Some(queued) = self.receiver.recv().await {
            let policy = self.policies.for_kind(queued.job.kind());
            let handler = handler.clone();
            let failures = self.failures.clone();
            tokio::spawn(async move {
                execute(queued, policy, handler, failures).await;
            });
        }
        tracing::info!("task worker stopped");
    }
}

async fn execute(
    queued: QueuedJob,
    policy: RetryPolicy,
    handler: Arc<dyn JobHandler>,
    failures: Arc<RwLock<Vec<FailedJob>>>,
) {
    let QueuedJob { id, job } = queued;
    let kind = job.kind();
    let mut attempt = 1;

    loop {
        match handler.handle(&job).await {
            Ok(()) => {
                tracing::info!(job_id = %id, kind = %kind, attempt, "job completed");
                return;
            }
            Err(err) if policy.should_retry(attempt) => {
                tracing::warn!(
                    job_id = %id,
                    kind = %kind,
                    attempt,
                    max_attempts = policy.max_attempts,
                    error = %err,
                    "job attempt failed, retrying"
                );
                sleep(policy.delay).await;
                attempt += 1;
            }
            Err(err) => {
                tracing::error!(
                    job_id = %id,
                    kind = %kind,
                    attempts = attempt,
                    error = %err,
                    "job failed after exhausting retries"
                );
                failures.write().await.push(FailedJob {
                    job_id: id,
                    job,
                    attempts: attempt,
                    error: err.to_string(),
                    failed_at: Utc::now(),
                });
                return;
            }
        }
    }
}
