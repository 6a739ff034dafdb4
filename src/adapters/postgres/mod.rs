//! PostgreSQL adapters - Database implementations for storage ports.
//!
//! - `PostgresConversationStore` - Interview state as JSONB rows
//! - `PostgresConfigSource` - Survey definition as a single JSONB row
//!
//! `connect` opens the pool and applies the bundled migrations.

mod config_source;
mod conversation_store;

pub use config_source::PostgresConfigSource;
pub use conversation_store::PostgresConversationStore;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DatabaseConfig;
use crate::ports::StoreError;

/// Opens a connection pool and optionally runs migrations.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, StoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout())
        .connect(&config.url)
        .await
        .map_err(|e| StoreError::DatabaseError(format!("Failed to connect: {}", e)))?;

    if config.run_migrations {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StoreError::DatabaseError(format!("Failed to run migrations: {}", e)))?;
        tracing::info!("database migrations applied");
    }

    Ok(pool)
}
