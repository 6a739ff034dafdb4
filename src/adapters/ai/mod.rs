//! Model Backend Adapters.
//!
//! ## Available Adapters
//!
//! - `MockModelBackend` - Scripted backend for testing
//! - `OpenAIProvider` - OpenAI chat completions with tool calling

mod mock_provider;
mod openai_provider;

pub use mock_provider::{MockError, MockModelBackend, MockResponse};
pub use openai_provider::{OpenAIConfig, OpenAIProvider};
