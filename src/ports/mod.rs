//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Dialogue Ports
//!
//! - `ModelBackend` - Chat completion with tool calling
//! - `ConversationStore` - Per-conversation interview state
//! - `ConfigSource` - Runtime-editable fields, prompt and tracks
//!
//! ## Handoff Ports
//!
//! - `TaskQueue` - Out-of-band job execution with retries
//! - `DocumentStore` - Attachments and generated documents
//! - `RecordSink` - External CRM
//! - `TrackCatalog` - Track labels for the periodic refresh
//! - `ChatNotifier` - Document delivery back to the user

mod chat_notifier;
mod config_source;
mod conversation_store;
mod document_store;
mod model_backend;
mod record_sink;
mod task_queue;
mod track_catalog;

pub use chat_notifier::ChatNotifier;
pub use config_source::ConfigSource;
pub use conversation_store::{ConversationStore, StoreError};
pub use document_store::{DocumentStore, DocumentStoreError, StoredDocument};
pub use model_backend::{
    ModelBackend, ModelError, ModelOutcome, ModelReply, ModelRequest, TokenUsage, ToolChoice,
};
pub use record_sink::{RecordSink, SinkError};
pub use task_queue::{JobError, JobHandler, QueueError, TaskQueue};
pub use track_catalog::TrackCatalog;
