//! Chat Notifier Port - Pushes generated documents back to the user.

use async_trait::async_trait;

use crate::domain::foundation::ConversationId;

use super::{SinkError, StoredDocument};

#[async_trait]
pub trait ChatNotifier: Send + Sync {
    async fn send_document(
        &self,
        conversation_id: &ConversationId,
        document: &StoredDocument,
        caption: &str,
    ) -> Result<(), SinkError>;
}
