//! GenerateDocumentHandler - Builds the HTML summary and sends it to the user.

use std::sync::Arc;

use crate::domain::handoff::{
    document_prompt, document_tool, parse_document_arguments, GenerateDocumentJob,
    DOCUMENT_FILE_NAME, DOCUMENT_TOOL,
};
use crate::domain::survey::{text, HistoryEntry, TextKey, DEFAULT_LANGUAGE};
use crate::ports::{
    ChatNotifier, DocumentStore, JobError, ModelBackend, ModelError, ModelRequest,
};

const HTML_CONTENT_TYPE: &str = "text/html";

pub struct GenerateDocumentHandler {
    backend: Arc<dyn ModelBackend>,
    documents: Arc<dyn DocumentStore>,
    notifier: Arc<dyn ChatNotifier>,
}

impl GenerateDocumentHandler {
    pub fn new(
        backend: Arc<dyn ModelBackend>,
        documents: Arc<dyn DocumentStore>,
        notifier: Arc<dyn ChatNotifier>,
    ) -> Self {
        Self {
            backend,
            documents,
            notifier,
        }
    }

    pub async fn handle(&self, job: &GenerateDocumentJob) -> Result<(), JobError> {
        let language = job.language.as_deref().unwrap_or(DEFAULT_LANGUAGE);
        let request = ModelRequest::new(vec![HistoryEntry::system(document_prompt(&job.data, language))])
            .with_tool(document_tool())
            .require_tool();
        let reply = self.backend.complete(request).await?;

        let call = reply
            .find_call(DOCUMENT_TOOL)
            .ok_or_else(|| JobError::invalid("model did not call save_document"))?;
        let html = parse_document_arguments(&call.arguments)
            .map_err(|e| ModelError::parse(format!("save_document arguments: {}", e)))?;

        let key = self
            .documents
            .save(DOCUMENT_FILE_NAME, html.into_bytes(), HTML_CONTENT_TYPE)
            .await?;
        let document = self
            .documents
            .get(&key)
            .await?
            .ok_or_else(|| JobError::invalid(format!("document {} vanished after save", key)))?;

        let caption = text(TextKey::DocumentCaption, job.language.as_deref());
        self.notifier
            .send_document(&job.conversation_id, &document, caption)
            .await?;

        tracing::info!(conversation_id = %job.conversation_id, key = %key, "summary document sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockModelBackend;
    use crate::adapters::document::InMemoryDocumentStore;
    use crate::adapters::notifier::InMemoryNotifier;
    use crate::domain::foundation::ConversationId;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn job(language: Option<&str>) -> GenerateDocumentJob {
        GenerateDocumentJob {
            conversation_id: ConversationId::new("3").unwrap(),
            data: BTreeMap::from([("name".to_string(), "Ana".to_string())]),
            language: language.map(str::to_string),
        }
    }

    fn fixture(
        backend: MockModelBackend,
    ) -> (GenerateDocumentHandler, InMemoryDocumentStore, InMemoryNotifier) {
        let documents = InMemoryDocumentStore::new();
        let notifier = InMemoryNotifier::new();
        let handler = GenerateDocumentHandler::new(
            Arc::new(backend),
            Arc::new(documents.clone()),
            Arc::new(notifier.clone()),
        );
        (handler, documents, notifier)
    }

    #[tokio::test]
    async fn saves_and_sends_localized_summary() {
        let backend = MockModelBackend::new().with_tool_call(
            DOCUMENT_TOOL,
            json!({"html": "<h1>Ana</h1>"}),
            30,
        );
        let (handler, documents, notifier) = fixture(backend.clone());

        handler.handle(&job(Some("ru"))).await.unwrap();

        let sent = notifier.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].caption, text(TextKey::DocumentCaption, Some("ru")));
        let stored = documents.get(&sent[0].key).await.unwrap().unwrap();
        assert_eq!(stored.bytes, b"<h1>Ana</h1>".to_vec());
        assert_eq!(stored.content_type, "text/html");
        assert!(backend.get_calls()[0].messages[0]
            .content
            .as_deref()
            .unwrap()
            .contains("'ru'"));
    }

    #[tokio::test]
    async fn malformed_arguments_fail_without_sending() {
        let backend = MockModelBackend::new().with_tool_call(DOCUMENT_TOOL, json!({"body": 1}), 5);
        let (handler, documents, notifier) = fixture(backend);

        let result = handler.handle(&job(None)).await;

        assert!(matches!(result, Err(JobError::Model(ModelError::Parse(_)))));
        assert_eq!(documents.document_count().await, 0);
        assert!(notifier.sent().await.is_empty());
    }
}
