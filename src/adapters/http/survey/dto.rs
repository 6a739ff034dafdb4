//! Request and response bodies for conversation endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::DocumentKey;
use crate::domain::survey::InterviewState;

#[derive(Debug, Clone, Deserialize)]
pub struct MessageRequest {
    pub text: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Either an answer or the budget-exhausted notice.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum MessageResponse {
    Answer { answer: String },
    Status { status: String, message: String },
}

impl MessageResponse {
    pub fn budget_exhausted(message: impl Into<String>) -> Self {
        Self::Status {
            status: "budget_exhausted".to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileRequest {
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub track: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub conversation_id: String,
    pub language: Option<String>,
    pub track: Option<String>,
    pub display_name: Option<String>,
    pub tokens_remaining: i64,
    pub completed: bool,
}

impl ProfileResponse {
    pub fn from_state(conversation_id: &str, state: &InterviewState) -> Self {
        Self {
            conversation_id: conversation_id.to_string(),
            language: state.language.clone(),
            track: state.track.clone(),
            display_name: state.display_name.clone(),
            tokens_remaining: state.tokens_remaining,
            completed: state.completed,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttachmentQuery {
    #[serde(default)]
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttachmentResponse {
    pub key: String,
    pub first: bool,
    pub message: String,
}

impl AttachmentResponse {
    pub fn new(key: &DocumentKey, first: bool, message: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            first,
            message: message.into(),
        }
    }
}
