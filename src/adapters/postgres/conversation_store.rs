//! PostgreSQL implementation of ConversationStore.
//!
//! Each conversation is one row holding its interview state as JSONB.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgPool, Row};

use crate::domain::foundation::ConversationId;
use crate::domain::survey::InterviewState;
use crate::ports::{ConversationStore, StoreError};

#[derive(Clone)]
pub struct PostgresConversationStore {
    pool: PgPool,
}

impl PostgresConversationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationStore for PostgresConversationStore {
    async fn get(&self, id: &ConversationId) -> Result<Option<InterviewState>, StoreError> {
        let row = sqlx::query("SELECT state FROM conversations WHERE id = $1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::DatabaseError(format!("Failed to fetch conversation: {}", e)))?;

        match row {
            Some(row) => {
                let Json(state): Json<InterviewState> = row.try_get("state").map_err(|e| {
                    StoreError::DeserializationFailed(format!("Invalid state for {}: {}", id, e))
                })?;
                Ok(Some(state))
            }
            None => Ok(None),
        }
    }

    async fn put(&self, id: &ConversationId, state: &InterviewState) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO conversations (id, state, created_at, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE SET
                state = EXCLUDED.state,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(id.as_str())
        .bind(Json(state))
        .bind(state.created_at)
        .bind(state.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::DatabaseError(format!("Failed to save conversation: {}", e)))?;

        Ok(())
    }

    async fn list(&self) -> Result<Vec<(ConversationId, InterviewState)>, StoreError> {
        let rows = sqlx::query("SELECT id, state FROM conversations ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::DatabaseError(format!("Failed to list conversations: {}", e)))?;

        rows.into_iter()
            .map(|row| {
                let raw_id: String = row
                    .try_get("id")
                    .map_err(|e| StoreError::DeserializationFailed(e.to_string()))?;
                let id = ConversationId::new(raw_id)
                    .map_err(|e| StoreError::DeserializationFailed(e.to_string()))?;
                let Json(state): Json<InterviewState> = row
                    .try_get("state")
                    .map_err(|e| StoreError::DeserializationFailed(e.to_string()))?;
                Ok((id, state))
            })
            .collect()
    }

    async fn clear(&self) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM conversations")
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::DatabaseError(format!("Failed to clear conversations: {}", e)))?;
        Ok(())
    }
}
