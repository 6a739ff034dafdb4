//! Mock Model Backend for testing.
//!
//! Replays a script of replies in order, records every request, and can be
//! told what to return once the script runs out.
//!
//! # Example
//!
//! ```ignore
//! let backend = MockModelBackend::new()
//!     .with_set_field(0, "Ana", 15)
//!     .with_answer("What's your email?", 0);
//!
//! let reply = backend.complete(request).await?;
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::survey::{ToolCall, SET_FIELD_TOOL};
use crate::ports::{ModelBackend, ModelError, ModelReply, ModelRequest, TokenUsage};

/// A scripted reply.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Reply(ModelReply),
    Error(MockError),
}

/// Mock error types for testing error handling.
#[derive(Debug, Clone)]
pub enum MockError {
    RateLimited { retry_after_secs: u32 },
    Unavailable { message: String },
    AuthenticationFailed,
    Network { message: String },
    Timeout { timeout_secs: u32 },
}

impl From<MockError> for ModelError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::RateLimited { retry_after_secs } => ModelError::rate_limited(retry_after_secs),
            MockError::Unavailable { message } => ModelError::unavailable(message),
            MockError::AuthenticationFailed => ModelError::AuthenticationFailed,
            MockError::Network { message } => ModelError::network(message),
            MockError::Timeout { timeout_secs } => ModelError::Timeout { timeout_secs },
        }
    }
}

/// Scripted model backend.
#[derive(Debug, Clone)]
pub struct MockModelBackend {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    /// Returned once the script is exhausted.
    fallback: ModelReply,
    delay: Duration,
    calls: Arc<Mutex<Vec<ModelRequest>>>,
}

impl Default for MockModelBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockModelBackend {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            fallback: ModelReply::answer("Mock response", TokenUsage::default()),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_reply(self, reply: ModelReply) -> Self {
        lock(&self.responses).push_back(MockResponse::Reply(reply.with_model("mock-model-1")));
        self
    }

    pub fn with_answer(self, text: impl Into<String>, tokens: u32) -> Self {
        self.with_reply(ModelReply::answer(text, TokenUsage::total(tokens)))
    }

    pub fn with_directives(self, calls: Vec<ToolCall>, tokens: u32) -> Self {
        self.with_reply(ModelReply::directives(calls, TokenUsage::total(tokens)))
    }

    /// Queues a single `set_field` call.
    pub fn with_set_field(self, index: i64, value: &str, tokens: u32) -> Self {
        let call_id = format!("call_{}", lock(&self.responses).len());
        let arguments = serde_json::json!({"index": index, "value": value}).to_string();
        self.with_directives(vec![ToolCall::new(call_id, SET_FIELD_TOOL, arguments)], tokens)
    }

    /// Queues a single call to an arbitrary tool with JSON arguments.
    pub fn with_tool_call(self, tool: &str, arguments: serde_json::Value, tokens: u32) -> Self {
        let call_id = format!("call_{}", lock(&self.responses).len());
        self.with_directives(
            vec![ToolCall::new(call_id, tool, arguments.to_string())],
            tokens,
        )
    }

    pub fn with_empty(self, tokens: u32) -> Self {
        self.with_reply(ModelReply::empty(TokenUsage::total(tokens)))
    }

    pub fn with_error(self, error: MockError) -> Self {
        lock(&self.responses).push_back(MockResponse::Error(error));
        self
    }

    /// Sets the reply returned after the script is exhausted.
    pub fn with_fallback(mut self, reply: ModelReply) -> Self {
        self.fallback = reply;
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    pub fn get_calls(&self) -> Vec<ModelRequest> {
        lock(&self.calls).clone()
    }

    fn next_response(&self) -> MockResponse {
        lock(&self.responses)
            .pop_front()
            .unwrap_or_else(|| MockResponse::Reply(self.fallback.clone()))
    }
}

#[async_trait]
impl ModelBackend for MockModelBackend {
    async fn complete(&self, request: ModelRequest) -> Result<ModelReply, ModelError> {
        lock(&self.calls).push(request);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_response() {
            MockResponse::Reply(reply) => Ok(reply),
            MockResponse::Error(err) => Err(err.into()),
        }
    }

    fn model_name(&self) -> &str {
        "mock-model-1"
    }
}
