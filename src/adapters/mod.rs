//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Model backends (OpenAI, scripted mock)
//! - `storage` - Conversation state and survey definition (file, in-memory)
//! - `postgres` - Conversation state and survey definition (PostgreSQL)
//! - `document` - Attachments and generated documents
//! - `queue` - Background job execution with retries
//! - `crm` - Record sink and track catalog
//! - `notifier` - Document delivery back to the chat
//! - `http` - REST API (axum)

pub mod ai;
pub mod crm;
pub mod document;
pub mod http;
pub mod notifier;
pub mod postgres;
pub mod queue;
pub mod storage;
