//! Storage Adapters
//!
//! ## Available Adapters
//!
//! - **FileConversationStore** - Interview state as YAML files on disk
//! - **InMemoryConversationStore** - Interview state in memory (testing/development)
//! - **FileConfigSource** - Survey definition in a YAML file
//! - **InMemoryConfigSource** - Survey definition in memory
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{FileConversationStore, InMemoryConversationStore};
//!
//! // Production without a database: file-based storage
//! let store = FileConversationStore::new("./data/conversations");
//!
//! // Testing: in-memory storage
//! let store = InMemoryConversationStore::new();
//! ```

mod config_source;
mod file_conversation_store;
mod in_memory_conversation_store;

pub use config_source::{FileConfigSource, InMemoryConfigSource};
pub use file_conversation_store::FileConversationStore;
pub use in_memory_conversation_store::InMemoryConversationStore;
