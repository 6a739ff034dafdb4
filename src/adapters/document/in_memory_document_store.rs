//! In-memory DocumentStore for tests and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::DocumentKey;
use crate::ports::{DocumentStore, DocumentStoreError, StoredDocument};

#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStore {
    documents: Arc<RwLock<HashMap<DocumentKey, StoredDocument>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn document_count(&self) -> usize {
        self.documents.read().await.len()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn save(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<DocumentKey, DocumentStoreError> {
        if file_name.trim().is_empty() {
            return Err(DocumentStoreError::InvalidName(file_name.to_string()));
        }
        let key = DocumentKey::generate(file_name);
        let document = StoredDocument {
            key: key.clone(),
            content_type: content_type.to_string(),
            bytes,
        };
        self.documents.write().await.insert(key.clone(), document);
        Ok(key)
    }

    async fn get(&self, key: &DocumentKey) -> Result<Option<StoredDocument>, DocumentStoreError> {
        Ok(self.documents.read().await.get(key).cloned())
    }
}
