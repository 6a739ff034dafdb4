//! Application layer - Engine, command handlers and background jobs.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Conversation state is only mutated under its per-conversation lock.

pub mod conversation_locks;
pub mod engine;
pub mod handlers;
pub mod jobs;

pub use conversation_locks::{ConversationGuard, ConversationLocks, ExclusiveGuard};
pub use engine::{EngineSettings, SurveyEngine, TurnError};
pub use handlers::{
    AdminError, AdminHandler, AttachDocumentCommand, AttachDocumentHandler, AttachError,
    AttachResult, ProcessMessageCommand, ProcessMessageHandler, ProfileError, TurnOutcome,
    UpdateProfileCommand, UpdateProfileHandler,
};
pub use jobs::{
    spawn_track_refresh, DeliverRecordHandler, GenerateDocumentHandler, JobDispatcher,
    RefreshTracksHandler,
};
