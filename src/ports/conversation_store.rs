//! Conversation Store Port - Persistence of per-conversation interview state.

use async_trait::async_trait;

use crate::domain::foundation::ConversationId;
use crate::domain::survey::InterviewState;

/// Errors that can occur during conversation storage operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to serialize state: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize state: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Port for loading and saving interview state keyed by conversation.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Returns `None` for conversations that have never been saved.
    async fn get(&self, id: &ConversationId) -> Result<Option<InterviewState>, StoreError>;

    async fn put(&self, id: &ConversationId, state: &InterviewState) -> Result<(), StoreError>;

    /// All stored conversations ordered by id.
    async fn list(&self) -> Result<Vec<(ConversationId, InterviewState)>, StoreError>;

    /// Delete every stored conversation.
    async fn clear(&self) -> Result<(), StoreError>;
}
