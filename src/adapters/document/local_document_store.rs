//! Local Filesystem Document Store - Implementation of DocumentStore.
//!
//! Documents are flat files named by their key. The content type is kept in
//! a `<key>.type` sidecar next to the body.
//!
//! # Atomic Writes
//!
//! Bodies are written to `<key>.tmp` and renamed into place, so a crash
//! never leaves a partially written document under its final key.

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::domain::foundation::DocumentKey;
use crate::ports::{DocumentStore, DocumentStoreError, StoredDocument};

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Clone)]
pub struct LocalDocumentStore {
    base_path: PathBuf,
    max_bytes: usize,
}

impl LocalDocumentStore {
    /// ```rust,ignore
    /// let store = LocalDocumentStore::new("./data/documents", 10 * 1024 * 1024);
    /// ```
    pub fn new(base_path: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            base_path: base_path.into(),
            max_bytes,
        }
    }

    fn document_path(&self, key: &DocumentKey) -> PathBuf {
        self.base_path.join(key.as_str())
    }

    fn temp_path(&self, key: &DocumentKey) -> PathBuf {
        self.base_path.join(format!("{}.tmp", key))
    }

    fn content_type_path(&self, key: &DocumentKey) -> PathBuf {
        self.base_path.join(format!("{}.type", key))
    }

    async fn ensure_base_dir(&self) -> Result<(), DocumentStoreError> {
        fs::create_dir_all(&self.base_path).await.map_err(|e| {
            DocumentStoreError::IoError(format!(
                "Failed to create directory {}: {}",
                self.base_path.display(),
                e
            ))
        })
    }
}

#[async_trait]
impl DocumentStore for LocalDocumentStore {
    async fn save(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<DocumentKey, DocumentStoreError> {
        if file_name.trim().is_empty() {
            return Err(DocumentStoreError::InvalidName(file_name.to_string()));
        }
        if bytes.len() > self.max_bytes {
            return Err(DocumentStoreError::TooLarge {
                size: bytes.len(),
                max: self.max_bytes,
            });
        }

        self.ensure_base_dir().await?;
        let key = DocumentKey::generate(file_name);
        let temp_path = self.temp_path(&key);

        let mut file = fs::File::create(&temp_path)
            .await
            .map_err(|e| DocumentStoreError::IoError(format!("Failed to create temp file: {}", e)))?;
        file.write_all(&bytes)
            .await
            .map_err(|e| DocumentStoreError::IoError(format!("Failed to write document: {}", e)))?;
        file.sync_all()
            .await
            .map_err(|e| DocumentStoreError::IoError(format!("Failed to sync document: {}", e)))?;

        fs::write(self.content_type_path(&key), content_type)
            .await
            .map_err(|e| DocumentStoreError::IoError(e.to_string()))?;
        fs::rename(&temp_path, self.document_path(&key))
            .await
            .map_err(|e| DocumentStoreError::IoError(format!("Failed to rename document: {}", e)))?;

        tracing::debug!(key = %key, size = bytes.len(), "document saved");
        Ok(key)
    }

    async fn get(&self, key: &DocumentKey) -> Result<Option<StoredDocument>, DocumentStoreError> {
        let path = self.document_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)
            .await
            .map_err(|e| DocumentStoreError::IoError(e.to_string()))?;
        let content_type = fs::read_to_string(self.content_type_path(key))
            .await
            .unwrap_or_else(|_| DEFAULT_CONTENT_TYPE.to_string());

        Ok(Some(StoredDocument {
            key: key.clone(),
            content_type,
            bytes,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn save_then_get_returns_bytes_and_type() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalDocumentStore::new(temp_dir.path(), 1024);

        let key = store
            .save("cv.pdf", b"%PDF-1.4".to_vec(), "application/pdf")
            .await
            .unwrap();
        let document = store.get(&key).await.unwrap().unwrap();

        assert!(key.as_str().ends_with("_cv.pdf"));
        assert_eq!(key.file_name(), "cv.pdf");
        assert_eq!(document.bytes, b"%PDF-1.4".to_vec());
        assert_eq!(document.content_type, "application/pdf");
        assert!(!temp_dir.path().join(format!("{}.tmp", key)).exists());
    }

    #[tokio::test]
    async fn same_name_gets_distinct_keys() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalDocumentStore::new(temp_dir.path(), 1024);

        let first = store.save("cv.pdf", vec![1], "application/pdf").await.unwrap();
        let second = store.save("cv.pdf", vec![2], "application/pdf").await.unwrap();

        assert_ne!(first, second);
        assert_eq!(store.get(&first).await.unwrap().unwrap().bytes, vec![1]);
    }

    #[tokio::test]
    async fn rejects_oversized_documents() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalDocumentStore::new(temp_dir.path(), 4);

        let result = store.save("big.bin", vec![0; 5], "application/octet-stream").await;

        assert!(matches!(
            result,
            Err(DocumentStoreError::TooLarge { size: 5, max: 4 })
        ));
    }

    #[tokio::test]
    async fn rejects_blank_names() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalDocumentStore::new(temp_dir.path(), 4);

        let result = store.save("  ", vec![0], "text/plain").await;

        assert!(matches!(result, Err(DocumentStoreError::InvalidName(_))));
    }

    #[tokio::test]
    async fn missing_key_returns_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalDocumentStore::new(temp_dir.path(), 4);
        let key = DocumentKey::generate("nothing.txt");

        assert!(store.get(&key).await.unwrap().is_none());
    }
}
