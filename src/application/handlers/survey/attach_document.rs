//! AttachDocumentHandler - Stores an uploaded file and links it to the conversation.

use std::sync::Arc;

use crate::application::conversation_locks::ConversationLocks;
use crate::domain::foundation::{ConversationId, DocumentKey};
use crate::domain::handoff::{AddendumJob, Job};
use crate::domain::survey::{attach_document, InterviewState};
use crate::ports::{
    ConversationStore, DocumentStore, DocumentStoreError, QueueError, StoreError, TaskQueue,
};

#[derive(Debug, Clone)]
pub struct AttachDocumentCommand {
    pub conversation_id: ConversationId,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachResult {
    pub key: DocumentKey,
    /// True when this was the conversation's first attachment.
    pub first: bool,
    pub language: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AttachError {
    #[error("document store error: {0}")]
    Document(#[from] DocumentStoreError),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("queue error: {0}")]
    Queue(#[from] QueueError),
}

pub struct AttachDocumentHandler {
    documents: Arc<dyn DocumentStore>,
    store: Arc<dyn ConversationStore>,
    queue: Arc<dyn TaskQueue>,
    locks: ConversationLocks,
    start_tokens: i64,
}

impl AttachDocumentHandler {
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        store: Arc<dyn ConversationStore>,
        queue: Arc<dyn TaskQueue>,
        locks: ConversationLocks,
        start_tokens: i64,
    ) -> Self {
        Self {
            documents,
            store,
            queue,
            locks,
            start_tokens,
        }
    }

    pub async fn handle(&self, cmd: AttachDocumentCommand) -> Result<AttachResult, AttachError> {
        let id = cmd.conversation_id;
        let key = self
            .documents
            .save(&cmd.file_name, cmd.bytes, &cmd.content_type)
            .await?;

        let _guard = self.locks.acquire(&id).await;
        let mut state = self
            .store
            .get(&id)
            .await?
            .unwrap_or_else(|| InterviewState::new(self.start_tokens));

        let first = attach_document(&mut state, key.clone());
        if first {
            let job = AddendumJob {
                conversation_id: id.clone(),
                display_name: state.display_name.clone(),
                track: state.track.clone(),
                attachment: key.clone(),
            };
            let job_id = self.queue.enqueue(Job::DeliverAddendum(job)).await?;
            tracing::info!(conversation_id = %id, job_id = %job_id, "addendum enqueued");
        }

        self.store.put(&id, &state).await?;
        tracing::info!(conversation_id = %id, key = %key, first, "document attached");
        Ok(AttachResult {
            key,
            first,
            language: state.language,
        })
    }
}
