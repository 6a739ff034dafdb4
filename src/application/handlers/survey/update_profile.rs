//! UpdateProfileHandler - Sets language, track and display name.

use std::sync::Arc;

use crate::application::conversation_locks::ConversationLocks;
use crate::domain::foundation::ConversationId;
use crate::domain::survey::InterviewState;
use crate::ports::{ConfigSource, ConversationStore, StoreError};

#[derive(Debug, Clone, Default)]
pub struct UpdateProfileCommand {
    pub language: Option<String>,
    pub track: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("unknown track: {0}")]
    UnknownTrack(String),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

pub struct UpdateProfileHandler {
    store: Arc<dyn ConversationStore>,
    config: Arc<dyn ConfigSource>,
    locks: ConversationLocks,
    start_tokens: i64,
}

impl UpdateProfileHandler {
    pub fn new(
        store: Arc<dyn ConversationStore>,
        config: Arc<dyn ConfigSource>,
        locks: ConversationLocks,
        start_tokens: i64,
    ) -> Self {
        Self {
            store,
            config,
            locks,
            start_tokens,
        }
    }

    /// Applies the provided values; absent ones are left untouched.
    pub async fn handle(
        &self,
        id: &ConversationId,
        cmd: UpdateProfileCommand,
    ) -> Result<InterviewState, ProfileError> {
        if let Some(track) = &cmd.track {
            let definition = self.config.get().await?;
            if !definition.accepts_track(track) {
                return Err(ProfileError::UnknownTrack(track.clone()));
            }
        }

        let _guard = self.locks.acquire(id).await;
        let mut state = self
            .store
            .get(id)
            .await?
            .unwrap_or_else(|| InterviewState::new(self.start_tokens));

        if cmd.language.is_some() {
            state.language = cmd.language;
        }
        if cmd.track.is_some() {
            state.track = cmd.track;
        }
        if cmd.display_name.is_some() {
            state.display_name = cmd.display_name;
        }
        state.touch();

        self.store.put(id, &state).await?;
        tracing::debug!(conversation_id = %id, "profile updated");
        Ok(state)
    }
}
