//! Document Store Port - Binary storage for attachments and generated documents.

use async_trait::async_trait;

use crate::domain::foundation::DocumentKey;

#[derive(Debug, thiserror::Error)]
pub enum DocumentStoreError {
    #[error("Document too large: {size} bytes exceeds {max} limit")]
    TooLarge { size: usize, max: usize },

    #[error("Invalid document name: {0}")]
    InvalidName(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Document stored alongside its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    pub key: DocumentKey,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Port for saving and fetching documents by key.
///
/// Keys have the form `<uuid>_<file name>`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn save(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<DocumentKey, DocumentStoreError>;

    async fn get(&self, key: &DocumentKey) -> Result<Option<StoredDocument>, DocumentStoreError>;
}
