//! Periodic job scheduling.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::domain::handoff::Job;
use crate::ports::TaskQueue;

/// Enqueues a track refresh now and then every `period`.
pub fn spawn_track_refresh(queue: Arc<dyn TaskQueue>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(e) = queue.enqueue(Job::RefreshTracks).await {
                tracing::error!(error = %e, "failed to enqueue track refresh");
            }
        }
    })
}
