//! AdminHandler - Administrative operations over the survey and its conversations.

use std::sync::Arc;

use crate::application::conversation_locks::ConversationLocks;
use crate::domain::foundation::{ConversationId, ValidationError};
use crate::domain::survey::{render_csv, FieldRegistry, PromptTemplate, SurveyDefinition};
use crate::ports::{ConfigSource, ConversationStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("conversation not found: {0}")]
    NotFound(ConversationId),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

pub struct AdminHandler {
    store: Arc<dyn ConversationStore>,
    config: Arc<dyn ConfigSource>,
    locks: ConversationLocks,
}

impl AdminHandler {
    pub fn new(
        store: Arc<dyn ConversationStore>,
        config: Arc<dyn ConfigSource>,
        locks: ConversationLocks,
    ) -> Self {
        Self {
            store,
            config,
            locks,
        }
    }

    pub async fn config(&self) -> Result<SurveyDefinition, AdminError> {
        Ok(self.config.get().await?)
    }

    /// Replaces the field list, one name per line.
    ///
    /// Stored answers are keyed by index, so all conversations are cleared.
    /// In-flight turns finish first; none start until the reset is done.
    pub async fn set_fields(&self, text: &str) -> Result<FieldRegistry, AdminError> {
        let registry = FieldRegistry::parse(text)?;
        let _exclusive = self.locks.acquire_all().await;
        self.config.set_fields(registry.clone()).await?;
        self.store.clear().await?;
        tracing::info!(fields = registry.len(), "survey fields replaced, conversations cleared");
        Ok(registry)
    }

    /// Replaces the prompt template and clears all conversations.
    pub async fn set_prompt(&self, text: &str) -> Result<(), AdminError> {
        let template = PromptTemplate::new(text)?;
        let _exclusive = self.locks.acquire_all().await;
        self.config.set_prompt(template).await?;
        self.store.clear().await?;
        tracing::info!("prompt template replaced, conversations cleared");
        Ok(())
    }

    /// Tops up a conversation's balance and returns the new value.
    pub async fn credit_tokens(&self, id: &ConversationId, amount: u32) -> Result<i64, AdminError> {
        if amount == 0 {
            return Err(ValidationError::out_of_range("amount", 1, i64::from(u32::MAX), 0).into());
        }

        let _guard = self.locks.acquire(id).await;
        let mut state = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| AdminError::NotFound(id.clone()))?;

        let balance = state.credit(amount);
        self.store.put(id, &state).await?;
        tracing::info!(conversation_id = %id, amount, balance, "tokens credited");
        Ok(balance)
    }

    pub async fn clear(&self) -> Result<(), AdminError> {
        let _exclusive = self.locks.acquire_all().await;
        self.store.clear().await?;
        tracing::info!("all conversations cleared");
        Ok(())
    }

    /// CSV export of every conversation against the current registry.
    pub async fn export_csv(&self) -> Result<String, AdminError> {
        let definition = self.config.get().await?;
        let rows = self.store.list().await?;
        Ok(render_csv(&definition.fields, &rows))
    }
}
