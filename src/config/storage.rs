//! Local storage configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Where file-backed adapters keep their data.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Root directory for conversation YAML files (when no database is configured)
    #[serde(default = "default_conversations_dir")]
    pub conversations_dir: PathBuf,

    /// Root directory for uploaded and generated documents
    #[serde(default = "default_documents_dir")]
    pub documents_dir: PathBuf,

    /// Survey definition file used by the file-backed configuration source
    #[serde(default = "default_definition_file")]
    pub definition_file: PathBuf,

    /// Largest accepted attachment in bytes
    #[serde(default = "default_max_attachment_bytes")]
    pub max_attachment_bytes: usize,
}

impl StorageConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.conversations_dir.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("STORAGE__CONVERSATIONS_DIR"));
        }
        if self.documents_dir.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("STORAGE__DOCUMENTS_DIR"));
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            conversations_dir: default_conversations_dir(),
            documents_dir: default_documents_dir(),
            definition_file: default_definition_file(),
            max_attachment_bytes: default_max_attachment_bytes(),
        }
    }
}

fn default_conversations_dir() -> PathBuf {
    PathBuf::from("./data/conversations")
}

fn default_documents_dir() -> PathBuf {
    PathBuf::from("./data/documents")
}

fn default_definition_file() -> PathBuf {
    PathBuf::from("./data/survey.yaml")
}

fn default_max_attachment_bytes() -> usize {
    10 * 1024 * 1024
}
