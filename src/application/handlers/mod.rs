//! Command handlers.
//!
//! - `survey` - Turns, profile updates and attachments for one conversation
//! - `admin` - Survey configuration, token credits, clearing and export

pub mod admin;
pub mod survey;

pub use admin::{AdminError, AdminHandler};
pub use survey::{
    AttachDocumentCommand, AttachDocumentHandler, AttachError, AttachResult,
    ProcessMessageCommand, ProcessMessageHandler, ProfileError, TurnOutcome,
    UpdateProfileCommand, UpdateProfileHandler,
};
