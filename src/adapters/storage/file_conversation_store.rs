//! File-based Conversation Store Adapter
//!
//! Stores each conversation's interview state as `<id>.yaml` under a base
//! directory.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::foundation::ConversationId;
use crate::domain::survey::InterviewState;
use crate::ports::{ConversationStore, StoreError};

const EXTENSION: &str = "yaml";

#[derive(Debug, Clone)]
pub struct FileConversationStore {
    base_path: PathBuf,
}

impl FileConversationStore {
    /// ```ignore
    /// let store = FileConversationStore::new("./data/conversations");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn state_file_path(&self, id: &ConversationId) -> PathBuf {
        self.base_path.join(format!("{}.{}", id, EXTENSION))
    }

    async fn ensure_dir(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| StoreError::IoError(e.to_string()))
    }

    async fn read_state(path: &Path) -> Result<InterviewState, StoreError> {
        let yaml = fs::read_to_string(path)
            .await
            .map_err(|e| StoreError::IoError(e.to_string()))?;

        serde_yaml::from_str(&yaml).map_err(|e| StoreError::DeserializationFailed(e.to_string()))
    }

    /// Paths of every stored state file with the id parsed from its stem.
    async fn state_files(&self) -> Result<Vec<(ConversationId, PathBuf)>, StoreError> {
        let mut entries = match fs::read_dir(&self.base_path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::IoError(e.to_string())),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::IoError(e.to_string()))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            let id = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| ConversationId::new(s).ok());
            match id {
                Some(id) => files.push((id, path)),
                None => tracing::warn!(path = %path.display(), "skipping unrecognised state file"),
            }
        }
        files.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(files)
    }
}

#[async_trait]
impl ConversationStore for FileConversationStore {
    async fn get(&self, id: &ConversationId) -> Result<Option<InterviewState>, StoreError> {
        let file_path = self.state_file_path(id);

        if !file_path.exists() {
            return Ok(None);
        }

        Self::read_state(&file_path).await.map(Some)
    }

    async fn put(&self, id: &ConversationId, state: &InterviewState) -> Result<(), StoreError> {
        self.ensure_dir().await?;

        let yaml = serde_yaml::to_string(state)
            .map_err(|e| StoreError::SerializationFailed(e.to_string()))?;

        fs::write(self.state_file_path(id), yaml)
            .await
            .map_err(|e| StoreError::IoError(e.to_string()))
    }

    async fn list(&self) -> Result<Vec<(ConversationId, InterviewState)>, StoreError> {
        let mut states = Vec::new();
        for (id, path) in self.state_files().await? {
            states.push((id, Self::read_state(&path).await?));
        }
        Ok(states)
    }

    async fn clear(&self) -> Result<(), StoreError> {
        for (_, path) in self.state_files().await? {
            fs::remove_file(&path)
                .await
                .map_err(|e| StoreError::IoError(e.to_string()))?;
        }
        Ok(())
    }
}
