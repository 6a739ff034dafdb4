//! Retry policies for background jobs.

use std::time::Duration;

use super::job::JobKind;

/// Fixed-delay retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    pub fn single_attempt() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// True if another attempt is allowed after `attempt` (1-based) failed.
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}

/// Policy per job kind: record delivery and document generation share one,
/// the catalog refresh has its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicies {
    pub delivery: RetryPolicy,
    pub refresh: RetryPolicy,
}

impl RetryPolicies {
    pub fn for_kind(&self, kind: JobKind) -> RetryPolicy {
        match kind {
            JobKind::RefreshTracks => self.refresh,
            JobKind::DeliverFullRecord | JobKind::DeliverAddendum | JobKind::GenerateDocument => {
                self.delivery
            }
        }
    }
}

impl Default for RetryPolicies {
    fn default() -> Self {
        Self {
            delivery: RetryPolicy::new(3, Duration::from_secs(60)),
            refresh: RetryPolicy::new(1, Duration::from_secs(60)),
        }
    }
}
