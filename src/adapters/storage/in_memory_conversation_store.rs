//! In-Memory Conversation Store Adapter
//!
//! Useful for testing and development.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::ConversationId;
use crate::domain::survey::InterviewState;
use crate::ports::{ConversationStore, StoreError};

#[derive(Debug, Clone, Default)]
pub struct InMemoryConversationStore {
    states: Arc<RwLock<BTreeMap<ConversationId, InterviewState>>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of stored conversations
    pub async fn state_count(&self) -> usize {
        self.states.read().await.len()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn get(&self, id: &ConversationId) -> Result<Option<InterviewState>, StoreError> {
        Ok(self.states.read().await.get(id).cloned())
    }

    async fn put(&self, id: &ConversationId, state: &InterviewState) -> Result<(), StoreError> {
        self.states.write().await.insert(id.clone(), state.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<(ConversationId, InterviewState)>, StoreError> {
        let states = self.states.read().await;
        Ok(states
            .iter()
            .map(|(id, state)| (id.clone(), state.clone()))
            .collect())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.states.write().await.clear();
        Ok(())
    }
}
