//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Stable identifier of one interview conversation.
///
/// Chosen by the transport (e.g. a chat id), so it is an opaque non-empty
/// string rather than a generated UUID.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    /// Creates a new ConversationId, returning error if empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("conversation_id"));
        }
        if id.contains(['/', '\\']) || id == "." || id == ".." {
            return Err(ValidationError::invalid_format(
                "conversation_id",
                "must not contain path separators",
            ));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ConversationId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Opaque key of a stored document, formatted `<uuid>_<file name>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentKey(String);

impl DocumentKey {
    /// Generates a fresh key for a file name.
    ///
    /// Path separators in the name are replaced so the key is always a
    /// single path component.
    pub fn generate(file_name: &str) -> Self {
        let safe: String = file_name
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect();
        Self(format!("{}_{}", Uuid::new_v4(), safe))
    }

    /// Wraps an existing key, e.g. one read back from storage.
    pub fn from_string(key: impl Into<String>) -> Result<Self, ValidationError> {
        let key = key.into();
        if key.is_empty() {
            return Err(ValidationError::empty_field("document_key"));
        }
        if key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(ValidationError::invalid_format(
                "document_key",
                "must be a single path component",
            ));
        }
        Ok(Self(key))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The original file name part of the key.
    pub fn file_name(&self) -> &str {
        self.0.split_once('_').map(|(_, name)| name).unwrap_or(&self.0)
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a background job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(Uuid);

impl JobId {
    /// Creates a new random JobId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversation_id_accepts_chat_ids() {
        let id = ConversationId::new("123456789").unwrap();
        assert_eq!(id.as_str(), "123456789");
        assert_eq!(id.to_string(), "123456789");
    }

    #[test]
    fn conversation_id_rejects_empty_string() {
        match ConversationId::new("  ") {
            Err(ValidationError::EmptyField { field }) => assert_eq!(field, "conversation_id"),
            other => panic!("Expected EmptyField error, got {:?}", other),
        }
    }

    #[test]
    fn conversation_id_rejects_path_traversal() {
        assert!(ConversationId::new("../etc").is_err());
        assert!(ConversationId::new("..").is_err());
        assert!("a\\b".parse::<ConversationId>().is_err());
    }

    #[test]
    fn conversation_id_serializes_transparently() {
        let id = ConversationId::new("chat-1").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"chat-1\"");
    }

    #[test]
    fn document_key_keeps_file_name() {
        let key = DocumentKey::generate("resume.pdf");
        assert!(key.as_str().ends_with("_resume.pdf"));
        assert_eq!(key.file_name(), "resume.pdf");
        assert_ne!(key, DocumentKey::generate("resume.pdf"));
    }

    #[test]
    fn document_key_sanitizes_separators() {
        let key = DocumentKey::generate("../../secret.txt");
        assert!(!key.as_str().contains('/'));
        assert!(DocumentKey::from_string(key.as_str()).is_ok());
    }

    #[test]
    fn document_key_rejects_paths() {
        assert!(DocumentKey::from_string("").is_err());
        assert!(DocumentKey::from_string("a/b").is_err());
        assert!(DocumentKey::from_string("..hidden").is_err());
    }

    #[test]
    fn job_ids_are_unique() {
        assert_ne!(JobId::new(), JobId::new());
    }
}
