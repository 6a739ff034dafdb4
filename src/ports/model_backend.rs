//! Model Backend Port - Interface for the chat-completion model.
//!
//! The engine sends the rendered conversation plus the tools the model may
//! call, and receives a tagged reply: a text answer, a batch of tool calls,
//! or nothing. Every reply carries token usage so the caller can debit the
//! conversation budget regardless of the outcome.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::survey::{HistoryEntry, ToolCall, ToolDefinition};

/// Port for model completions.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    async fn complete(&self, request: ModelRequest) -> Result<ModelReply, ModelError>;

    /// Model identifier, used for logging.
    fn model_name(&self) -> &str;
}

/// Whether the model may answer in text or must call a tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolChoice {
    #[default]
    Auto,
    Required,
}

#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub messages: Vec<HistoryEntry>,
    pub tools: Vec<ToolDefinition>,
    pub tool_choice: ToolChoice,
}

impl ModelRequest {
    pub fn new(messages: Vec<HistoryEntry>) -> Self {
        Self {
            messages,
            tools: Vec::new(),
            tool_choice: ToolChoice::Auto,
        }
    }

    pub fn with_tool(mut self, tool: ToolDefinition) -> Self {
        self.tools.push(tool);
        self
    }

    /// Forces the model to call one of the offered tools.
    pub fn require_tool(mut self) -> Self {
        self.tool_choice = ToolChoice::Required;
        self
    }
}

/// What the model produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelOutcome {
    Answer(String),
    Directives {
        content: Option<String>,
        calls: Vec<ToolCall>,
    },
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelReply {
    pub outcome: ModelOutcome,
    pub usage: TokenUsage,
    pub model: String,
}

impl ModelReply {
    pub fn answer(text: impl Into<String>, usage: TokenUsage) -> Self {
        Self {
            outcome: ModelOutcome::Answer(text.into()),
            usage,
            model: String::new(),
        }
    }

    pub fn directives(calls: Vec<ToolCall>, usage: TokenUsage) -> Self {
        Self {
            outcome: ModelOutcome::Directives {
                content: None,
                calls,
            },
            usage,
            model: String::new(),
        }
    }

    pub fn empty(usage: TokenUsage) -> Self {
        Self {
            outcome: ModelOutcome::Empty,
            usage,
            model: String::new(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// First tool call with the given name, if any.
    pub fn find_call(&self, tool_name: &str) -> Option<&ToolCall> {
        match &self.outcome {
            ModelOutcome::Directives { calls, .. } => calls.iter().find(|c| c.name == tool_name),
            _ => None,
        }
    }
}

/// Token usage reported by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }

    /// Usage with only a total, as scripted backends report it.
    pub fn total(total_tokens: u32) -> Self {
        Self {
            prompt_tokens: 0,
            completion_tokens: 0,
            total_tokens,
        }
    }
}

/// Model backend errors.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Rate limited by provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    #[error("context too long: {0}")]
    ContextTooLong(String),

    #[error("provider unavailable: {message}")]
    Unavailable { message: String },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },
}

impl ModelError {
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ModelError::RateLimited { .. }
                | ModelError::Unavailable { .. }
                | ModelError::Network(_)
                | ModelError::Timeout { .. }
        )
    }
}
