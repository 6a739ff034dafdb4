//! Document adapters - Implementations of the DocumentStore port.
//!
//! - `LocalDocumentStore` - Documents on the local filesystem
//! - `InMemoryDocumentStore` - Documents in memory (testing/development)

mod in_memory_document_store;
mod local_document_store;

pub use in_memory_document_store::InMemoryDocumentStore;
pub use local_document_store::LocalDocumentStore;
