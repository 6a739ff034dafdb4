//! Webhook chat notifier.
//!
//! Posts the document as multipart form data (`conversation_id`, `caption`,
//! `document`) to a webhook that the chat transport relays to the user.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;

use crate::domain::foundation::ConversationId;
use crate::ports::{ChatNotifier, SinkError, StoredDocument};

pub struct WebhookNotifier {
    url: String,
    http_client: Client,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, http_client: Client) -> Self {
        Self {
            url: url.into(),
            http_client,
        }
    }
}

#[async_trait]
impl ChatNotifier for WebhookNotifier {
    async fn send_document(
        &self,
        conversation_id: &ConversationId,
        document: &StoredDocument,
        caption: &str,
    ) -> Result<(), SinkError> {
        let part = Part::bytes(document.bytes.clone())
            .file_name(document.key.file_name().to_string())
            .mime_str(&document.content_type)
            .map_err(|e| SinkError::Network(e.to_string()))?;
        let form = Form::new()
            .text("conversation_id", conversation_id.to_string())
            .text("caption", caption.to_string())
            .part("document", part);

        let response = self
            .http_client
            .post(&self.url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| SinkError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SinkError::unexpected_status(status.as_u16(), body));
        }

        tracing::info!(conversation_id = %conversation_id, key = %document.key, "document delivered");
        Ok(())
    }
}
