//! PostgreSQL implementation of ConfigSource.
//!
//! The survey definition lives in a single JSONB row; individual parts are
//! replaced with `jsonb_set` so concurrent edits of different parts do not
//! overwrite each other.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgPool, Row};

use crate::domain::survey::{FieldRegistry, PromptTemplate, SurveyDefinition};
use crate::ports::{ConfigSource, StoreError};

#[derive(Clone)]
pub struct PostgresConfigSource {
    pool: PgPool,
}

impl PostgresConfigSource {
    /// Inserts `seed` unless a definition is already stored.
    pub async fn open(pool: PgPool, seed: &SurveyDefinition) -> Result<Self, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO survey_definition (id, definition)
            VALUES (1, $1)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(Json(seed))
        .execute(&pool)
        .await
        .map_err(|e| StoreError::DatabaseError(format!("Failed to seed survey definition: {}", e)))?;

        Ok(Self { pool })
    }

    async fn set_part(&self, path: &str, value: serde_json::Value) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE survey_definition
            SET definition = jsonb_set(definition, $1::text[], $2, true),
                updated_at = NOW()
            WHERE id = 1
            "#,
        )
        .bind(vec![path.to_string()])
        .bind(Json(value))
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::DatabaseError(format!("Failed to update {}: {}", path, e)))?;

        Ok(())
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, StoreError> {
    serde_json::to_value(value).map_err(|e| StoreError::SerializationFailed(e.to_string()))
}

#[async_trait]
impl ConfigSource for PostgresConfigSource {
    async fn get(&self) -> Result<SurveyDefinition, StoreError> {
        let row = sqlx::query("SELECT definition FROM survey_definition WHERE id = 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::DatabaseError(format!("Failed to load survey definition: {}", e)))?;

        let Json(definition): Json<SurveyDefinition> = row
            .try_get("definition")
            .map_err(|e| StoreError::DeserializationFailed(e.to_string()))?;
        Ok(definition)
    }

    async fn set_fields(&self, fields: FieldRegistry) -> Result<(), StoreError> {
        self.set_part("fields", to_json(&fields)?).await
    }

    async fn set_prompt(&self, prompt: PromptTemplate) -> Result<(), StoreError> {
        self.set_part("prompt", to_json(&prompt)?).await
    }

    async fn set_tracks(&self, tracks: Vec<String>) -> Result<(), StoreError> {
        self.set_part("tracks", to_json(&tracks)?).await
    }
}
