//! Conversation-facing command handlers.

mod attach_document;
mod process_message;
mod update_profile;

pub use attach_document::{
    AttachDocumentCommand, AttachDocumentHandler, AttachError, AttachResult,
};
pub use process_message::{ProcessMessageCommand, ProcessMessageHandler, TurnOutcome};
pub use update_profile::{ProfileError, UpdateProfileCommand, UpdateProfileHandler};
