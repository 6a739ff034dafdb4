//! Chat notifier adapters.
//!
//! - `WebhookNotifier` - Multipart POST to the chat transport's webhook
//! - `InMemoryNotifier` - Records deliveries

mod in_memory_notifier;
mod webhook_notifier;

pub use in_memory_notifier::{InMemoryNotifier, SentDocument};
pub use webhook_notifier::WebhookNotifier;
