//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid socket address: {0}")]
    InvalidSocketAddr(String),

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("Prompt template must contain the {{data}} placeholder")]
    PromptMissingPlaceholder,

    #[error("Survey must define at least one field")]
    NoSurveyFields,

    #[error("Max rounds must be at least 1")]
    InvalidMaxRounds,

    #[error("History limit must be positive")]
    InvalidHistoryLimit,

    #[error("Invalid URL for {0}")]
    InvalidUrl(&'static str),

    #[error("Retry attempts must be at least 1")]
    InvalidRetryAttempts,
}
