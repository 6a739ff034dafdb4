//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `SURVEY` prefix and
//! nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use survey_engine::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod crm;
mod database;
mod error;
mod queue;
mod server;
mod storage;
mod survey;

pub use ai::AiConfig;
pub use crm::{CrmConfig, NotifierConfig};
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use queue::QueueConfig;
pub use server::{Environment, ServerConfig};
pub use storage::StorageConfig;
pub use survey::SurveyConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// PostgreSQL persistence; file storage is used when absent
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Model backend configuration
    #[serde(default)]
    pub ai: AiConfig,

    /// Survey defaults and engine bounds
    #[serde(default)]
    pub survey: SurveyConfig,

    /// Local file storage
    #[serde(default)]
    pub storage: StorageConfig,

    /// CRM and track catalog
    #[serde(default)]
    pub crm: CrmConfig,

    /// Chat notifier for generated documents
    #[serde(default)]
    pub notifier: NotifierConfig,

    /// Background job retry policy
    #[serde(default)]
    pub queue: QueueConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// - `SURVEY__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `SURVEY__AI__OPENAI_API_KEY=...` -> `ai.openai_api_key = ...`
    ///
    /// A `.env` file is read first when present.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SURVEY")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        if let Some(database) = &self.database {
            database.validate()?;
        }
        self.ai.validate()?;
        self.survey.validate()?;
        self.storage.validate()?;
        self.crm.validate()?;
        self.notifier.validate()?;
        self.queue.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
