//! Background job queue configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::handoff::{RetryPolicies, RetryPolicy};

/// Retry policy and scheduling for handoff jobs.
#[derive(Debug, Clone, Deserialize)]
pub struct QueueConfig {
    /// Attempts for record delivery and document generation
    #[serde(default = "default_delivery_attempts")]
    pub delivery_attempts: u32,

    /// Attempts for the periodic track catalog refresh
    #[serde(default = "default_refresh_attempts")]
    pub refresh_attempts: u32,

    /// Fixed delay between attempts in seconds
    #[serde(default = "default_retry_delay")]
    pub retry_delay_secs: u64,

    /// How often the track catalog is refreshed, in seconds
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,

    /// Bounded channel capacity between producers and the worker
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl QueueConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn retry_policies(&self) -> RetryPolicies {
        RetryPolicies {
            delivery: RetryPolicy::new(self.delivery_attempts, self.retry_delay()),
            refresh: RetryPolicy::new(self.refresh_attempts, self.retry_delay()),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.delivery_attempts == 0 || self.refresh_attempts == 0 {
            return Err(ValidationError::InvalidRetryAttempts);
        }
        if self.capacity == 0 {
            return Err(ValidationError::MissingRequired("QUEUE__CAPACITY"));
        }
        Ok(())
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            delivery_attempts: default_delivery_attempts(),
            refresh_attempts: default_refresh_attempts(),
            retry_delay_secs: default_retry_delay(),
            refresh_interval_secs: default_refresh_interval(),
            capacity: default_capacity(),
        }
    }
}

fn default_delivery_attempts() -> u32 {
    3
}

fn default_refresh_attempts() -> u32 {
    1
}

fn default_retry_delay() -> u64 {
    60
}

fn default_refresh_interval() -> u64 {
    24 * 60 * 60
}

fn default_capacity() -> usize {
    256
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_defaults() {
        let config = QueueConfig::default();
        assert_eq!(config.delivery_attempts, 3);
        assert_eq!(config.refresh_attempts, 1);
        assert_eq!(config.retry_delay(), Duration::from_secs(60));
        assert_eq!(config.refresh_interval(), Duration::from_secs(86_400));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_retry_policies_follow_config() {
        let config = QueueConfig {
            delivery_attempts: 5,
            retry_delay_secs: 2,
            ..Default::default()
        };
        let policies = config.retry_policies();
        assert_eq!(policies.delivery.max_attempts, 5);
        assert_eq!(policies.delivery.delay, Duration::from_secs(2));
        assert_eq!(policies.refresh.max_attempts, 1);
    }

    #[test]
    fn test_validation_zero_attempts() {
        let config = QueueConfig {
            delivery_attempts: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidRetryAttempts)
        ));
    }
}
