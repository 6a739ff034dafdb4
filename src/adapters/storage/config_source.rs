//! Survey definition sources kept in memory or in a YAML file.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::RwLock;

use crate::domain::survey::{FieldRegistry, PromptTemplate, SurveyDefinition};
use crate::ports::{ConfigSource, StoreError};

/// In-memory configuration source.
#[derive(Debug, Clone)]
pub struct InMemoryConfigSource {
    definition: Arc<RwLock<SurveyDefinition>>,
}

impl InMemoryConfigSource {
    pub fn new(definition: SurveyDefinition) -> Self {
        Self {
            definition: Arc::new(RwLock::new(definition)),
        }
    }
}

#[async_trait]
impl ConfigSource for InMemoryConfigSource {
    async fn get(&self) -> Result<SurveyDefinition, StoreError> {
        Ok(self.definition.read().await.clone())
    }

    async fn set_fields(&self, fields: FieldRegistry) -> Result<(), StoreError> {
        self.definition.write().await.fields = fields;
        Ok(())
    }

    async fn set_prompt(&self, prompt: PromptTemplate) -> Result<(), StoreError> {
        self.definition.write().await.prompt = prompt;
        Ok(())
    }

    async fn set_tracks(&self, tracks: Vec<String>) -> Result<(), StoreError> {
        self.definition.write().await.tracks = tracks;
        Ok(())
    }
}

/// Configuration source persisted as a single YAML file.
///
/// The file is written through on every change; reads are served from memory.
#[derive(Debug, Clone)]
pub struct FileConfigSource {
    path: PathBuf,
    definition: Arc<RwLock<SurveyDefinition>>,
}

impl FileConfigSource {
    /// Loads the file if present, otherwise writes `seed` to it.
    pub async fn open<P: AsRef<Path>>(path: P, seed: SurveyDefinition) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let definition = if path.exists() {
            let yaml = fs::read_to_string(&path)
                .await
                .map_err(|e| StoreError::IoError(e.to_string()))?;
            serde_yaml::from_str(&yaml)
                .map_err(|e| StoreError::DeserializationFailed(e.to_string()))?
        } else {
            Self::write(&path, &seed).await?;
            seed
        };

        Ok(Self {
            path,
            definition: Arc::new(RwLock::new(definition)),
        })
    }

    async fn write(path: &Path, definition: &SurveyDefinition) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::IoError(e.to_string()))?;
        }
        let yaml = serde_yaml::to_string(definition)
            .map_err(|e| StoreError::SerializationFailed(e.to_string()))?;
        fs::write(path, yaml)
            .await
            .map_err(|e| StoreError::IoError(e.to_string()))
    }

    async fn update(&self, change: impl FnOnce(&mut SurveyDefinition)) -> Result<(), StoreError> {
        let mut definition = self.definition.write().await;
        let mut next = definition.clone();
        change(&mut next);
        Self::write(&self.path, &next).await?;
        *definition = next;
        Ok(())
    }
}

#[async_trait]
impl ConfigSource for FileConfigSource {
    async fn get(&self) -> Result<SurveyDefinition, StoreError> {
        Ok(self.definition.read().await.clone())
    }

    async fn set_fields(&self, fields: FieldRegistry) -> Result<(), StoreError> {
        self.update(|d| d.fields = fields).await
    }

    async fn set_prompt(&self, prompt: PromptTemplate) -> Result<(), StoreError> {
        self.update(|d| d.prompt = prompt).await
    }

    async fn set_tracks(&self, tracks: Vec<String>) -> Result<(), StoreError> {
        self.update(|d| d.tracks = tracks).await
    }
}
