//! In-memory ChatNotifier; used in tests and when no webhook is configured.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{ConversationId, DocumentKey};
use crate::ports::{ChatNotifier, SinkError, StoredDocument};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentDocument {
    pub conversation_id: ConversationId,
    pub key: DocumentKey,
    pub caption: String,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryNotifier {
    sent: Arc<RwLock<Vec<SentDocument>>>,
}

impl InMemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<SentDocument> {
        self.sent.read().await.clone()
    }
}

#[async_trait]
impl ChatNotifier for InMemoryNotifier {
    async fn send_document(
        &self,
        conversation_id: &ConversationId,
        document: &StoredDocument,
        caption: &str,
    ) -> Result<(), SinkError> {
        tracing::info!(
            conversation_id = %conversation_id,
            key = %document.key,
            "document ready (no notifier webhook configured)"
        );
        self.sent.write().await.push(SentDocument {
            conversation_id: conversation_id.clone(),
            key: document.key.clone(),
            caption: caption.to_string(),
        });
        Ok(())
    }
}
